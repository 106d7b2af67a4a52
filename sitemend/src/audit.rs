//! Preload usage audit.
//!
//! Report-only: finds `<link rel="preload">` declarations whose target is
//! an image the document never actually references, the usual cause of
//! "preloaded but not used" console warnings. Nothing is rewritten here;
//! the strip rule in [`crate::rules::html`] is the fixing counterpart.

use crate::constants::get_preload_link_re;
use regex::Regex;

const IMAGE_EXTENSIONS: &[&str] = &[".webp", ".jpg", ".jpeg", ".png"];

fn is_image_target(href: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| href.ends_with(ext))
}

/// Whether the document references the preloaded image outside the preload
/// itself, either as an `<img src>` or as a CSS `background-image`.
fn is_referenced(html: &str, href: &str) -> bool {
    let escaped = regex::escape(href);
    let img = Regex::new(&format!(r#"<img[^>]*src=["']?{escaped}["']?[^>]*>"#));
    let background = Regex::new(&format!(
        r#"background-image:\s*url\(["']?{escaped}["']?\)"#
    ));
    // A pattern that fails to build counts as referenced so the audit
    // never reports what it could not actually check.
    match (img, background) {
        (Ok(img), Ok(background)) => img.is_match(html) || background.is_match(html),
        _ => true,
    }
}

/// Audit one document; returns a description per unused image preload.
#[must_use]
pub fn audit_preloads(html: &str) -> Vec<String> {
    get_preload_link_re()
        .captures_iter(html)
        .filter_map(|caps| {
            let href = caps.get(1).map(|m| m.as_str())?;
            if is_image_target(href) && !is_referenced(html, href) {
                Some(format!("unused preload: {href}"))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_unreferenced_image_preload() {
        let html = r#"<link rel="preload" href="hero.webp" as="image"><img src="other.webp">"#;
        assert_eq!(audit_preloads(html), vec!["unused preload: hero.webp"]);
    }

    #[test]
    fn img_reference_counts_as_used() {
        let html = r#"<link rel="preload" href="hero.webp" as="image"><img src="hero.webp">"#;
        assert!(audit_preloads(html).is_empty());
    }

    #[test]
    fn background_image_counts_as_used() {
        let html = concat!(
            r#"<link rel="preload" href="bg.png" as="image">"#,
            r#"<style>.hero { background-image: url("bg.png"); }</style>"#
        );
        assert!(audit_preloads(html).is_empty());
    }

    #[test]
    fn non_image_preloads_are_ignored() {
        let html = r#"<link rel="preload" href="font.woff2" as="font" crossorigin>"#;
        assert!(audit_preloads(html).is_empty());
    }

    #[test]
    fn multiple_unused_preloads_all_reported() {
        let html = concat!(
            r#"<link rel="preload" href="a.webp" as="image">"#,
            r#"<link rel="preload" href="b.jpg" as="image">"#
        );
        assert_eq!(audit_preloads(html).len(), 2);
    }
}
