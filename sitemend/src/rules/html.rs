//! HTML fix-up rules: image dimension completion, font preload scaffolding,
//! layout-stability styles, and unused-preload removal.
//!
//! Tag inspection goes through a small attribute scanner rather than
//! regexes over the raw markup, so "already has width/height" is decided
//! from the tag's actual attribute list regardless of attribute order.

use crate::constants::{
    get_blank_lines_re, get_font_preload_link_re, get_font_preload_marker_re, get_head_open_re,
    get_viewport_meta_re, FONT_PRELOAD_MARKER, FONT_PRELOAD_SNIPPET, STABILITY_SENTINEL,
    STABILITY_STYLE_BLOCK,
};
use crate::dimensions::DimensionTable;
use crate::engine::edits::{Edit, EditList};
use crate::engine::{Outcome, Rule};

/// Byte span of one scanned tag, including the angle brackets.
#[derive(Debug, Clone, Copy)]
struct TagSpan {
    start: usize,
    end: usize,
}

/// A parsed attribute: name, and value when one was written.
#[derive(Debug, Clone)]
struct Attr {
    name: String,
    value: Option<String>,
}

/// Scan for opening tags with the given name (`<img …>`).
///
/// Quote state is tracked while looking for the closing `>`, so a `>`
/// inside an attribute value does not end the tag. A tag that never closes
/// is dropped; the caller treats the document as having fewer matches.
fn scan_tags(text: &str, name: &str) -> Vec<TagSpan> {
    let bytes = text.as_bytes();
    // ASCII lowercasing keeps byte offsets aligned with the original text.
    let lower = text.to_ascii_lowercase();
    let needle = format!("<{name}");
    let mut spans = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find(&needle) {
        let start = from + rel;
        let after = start + needle.len();
        from = after;

        // Require a delimiter so `<imgx` is not a match.
        match bytes.get(after) {
            Some(b' ' | b'\t' | b'\n' | b'\r' | b'/' | b'>') => {}
            _ => continue,
        }

        let mut quote: Option<u8> = None;
        let mut end = None;
        for (offset, &b) in bytes[after..].iter().enumerate() {
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                }
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'>' => {
                        end = Some(after + offset + 1);
                        break;
                    }
                    b'<' => break,
                    _ => {}
                },
            }
        }

        if let Some(end) = end {
            spans.push(TagSpan { start, end });
            from = end;
        }
    }

    spans
}

/// Parse the attribute list of a tag span (text between the tag name and
/// the closing `>`).
fn parse_attrs(tag: &str) -> Vec<Attr> {
    let inner = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/');
    let mut chars = inner.chars();

    // Skip the tag name.
    for c in chars.by_ref() {
        if c.is_whitespace() {
            break;
        }
    }

    let mut attrs = Vec::new();
    let rest: String = chars.collect();
    let mut i = 0;
    let b = rest.as_bytes();

    while i < b.len() {
        while i < b.len() && (b[i] as char).is_whitespace() {
            i += 1;
        }
        if i >= b.len() {
            break;
        }

        let name_start = i;
        while i < b.len() && !(b[i] as char).is_whitespace() && b[i] != b'=' {
            i += 1;
        }
        let name = rest[name_start..i].to_lowercase();
        if name.is_empty() {
            i += 1;
            continue;
        }

        while i < b.len() && (b[i] as char).is_whitespace() {
            i += 1;
        }

        let mut value = None;
        if i < b.len() && b[i] == b'=' {
            i += 1;
            while i < b.len() && (b[i] as char).is_whitespace() {
                i += 1;
            }
            if i < b.len() && (b[i] == b'"' || b[i] == b'\'') {
                let quote = b[i];
                i += 1;
                let value_start = i;
                while i < b.len() && b[i] != quote {
                    i += 1;
                }
                value = Some(rest[value_start..i].to_owned());
                i = (i + 1).min(b.len());
            } else {
                let value_start = i;
                while i < b.len() && !(b[i] as char).is_whitespace() {
                    i += 1;
                }
                value = Some(rest[value_start..i].to_owned());
            }
        }

        attrs.push(Attr { name, value });
    }

    attrs
}

fn attr_value<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name == name)
        .and_then(|a| a.value.as_deref())
}

fn has_attr(attrs: &[Attr], name: &str) -> bool {
    attrs.iter().any(|a| a.name == name)
}

/// Filename part of a `src` value, with any query string stripped.
fn src_filename(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.rsplit('/').next().unwrap_or(path)
}

/// Adds explicit `width`/`height` attributes to `<img>` tags lacking them.
///
/// Sizes come from the injected [`DimensionTable`]. Attributes that are
/// already present are never overwritten; a tag with both is skipped
/// entirely.
pub struct ImageDimensionsRule {
    table: DimensionTable,
}

impl ImageDimensionsRule {
    /// Build the rule over a dimension table.
    #[must_use]
    pub fn new(table: DimensionTable) -> Self {
        Self { table }
    }
}

impl Rule for ImageDimensionsRule {
    fn name(&self) -> &'static str {
        "image-dimensions"
    }

    fn apply(&self, text: &str) -> Outcome {
        let mut edits = EditList::new();
        let mut descriptions = Vec::new();

        for span in scan_tags(text, "img") {
            let tag = &text[span.start..span.end];
            let attrs = parse_attrs(tag);

            let Some(src) = attr_value(&attrs, "src") else {
                continue;
            };
            let has_width = has_attr(&attrs, "width");
            let has_height = has_attr(&attrs, "height");
            if has_width && has_height {
                continue;
            }

            let filename = src_filename(src);
            let dims = self.table.lookup(filename);

            let mut addition = String::new();
            if !has_width {
                addition.push_str(&format!(r#" width="{}""#, dims.width));
            }
            if !has_height {
                addition.push_str(&format!(r#" height="{}""#, dims.height));
            }

            // Insert before `>`, or before `/>` on self-closing tags.
            let insert_at = if tag.ends_with("/>") {
                let mut p = span.end - 2;
                while p > span.start && text.as_bytes()[p - 1].is_ascii_whitespace() {
                    p -= 1;
                }
                p
            } else {
                span.end - 1
            };
            edits.push(Edit::insert(insert_at, addition.clone()));
            descriptions.push(format!("added{addition} to {filename}"));
        }

        if edits.is_empty() {
            return Outcome::Unchanged;
        }

        match edits.apply(text) {
            Ok(rewritten) => Outcome::Changed {
                text: rewritten,
                descriptions,
            },
            Err(_) => Outcome::Unchanged,
        }
    }
}

/// Inserts critical font preload links into `<head>`.
///
/// The links land right after the viewport meta tag when one exists,
/// otherwise at the start of `<head>`. The marker comment inside the
/// inserted block doubles as the sentinel that keeps this idempotent.
pub struct FontPreloadRule;

impl Rule for FontPreloadRule {
    fn name(&self) -> &'static str {
        "font-preload"
    }

    fn apply(&self, text: &str) -> Outcome {
        if text.contains(FONT_PRELOAD_MARKER) || get_font_preload_link_re().is_match(text) {
            return Outcome::Unchanged;
        }

        let Some(head_open) = get_head_open_re().find(text) else {
            return Outcome::Unchanged;
        };
        let head_close = match text.find("</head>") {
            Some(pos) if pos >= head_open.end() => pos,
            _ => return Outcome::Unchanged,
        };

        let head_body = &text[head_open.end()..head_close];
        let (insert_at, description) = match get_viewport_meta_re().find(head_body) {
            Some(m) => (
                head_open.end() + m.end(),
                "inserted critical font preload links after the viewport meta tag",
            ),
            None => (
                head_open.end(),
                "inserted critical font preload links at the start of <head>",
            ),
        };

        let mut rewritten = text.to_owned();
        rewritten.insert_str(insert_at, FONT_PRELOAD_SNIPPET);
        Outcome::changed(rewritten, description)
    }
}

/// Inserts the layout-stability `<style>` block just before `</head>`.
///
/// The `CLS Prevention` marker inside the block is the sentinel.
pub struct LayoutStabilityRule;

impl Rule for LayoutStabilityRule {
    fn name(&self) -> &'static str {
        "layout-stability"
    }

    fn apply(&self, text: &str) -> Outcome {
        if text.contains(STABILITY_SENTINEL) {
            return Outcome::Unchanged;
        }
        let Some(pos) = text.find("</head>") else {
            return Outcome::Unchanged;
        };

        let mut rewritten = text.to_owned();
        rewritten.insert_str(pos, STABILITY_STYLE_BLOCK);
        Outcome::changed(
            rewritten,
            "inserted layout stability style block before </head>",
        )
    }
}

/// Removes the Inter font preload links and their marker comment, then
/// collapses the blank-line runs the removal leaves behind.
pub struct StripFontPreloadsRule;

impl Rule for StripFontPreloadsRule {
    fn name(&self) -> &'static str {
        "strip-font-preloads"
    }

    fn apply(&self, text: &str) -> Outcome {
        let link_count = get_font_preload_link_re().find_iter(text).count();
        let marker_count = get_font_preload_marker_re().find_iter(text).count();
        if link_count == 0 && marker_count == 0 {
            return Outcome::Unchanged;
        }

        let mut rewritten = get_font_preload_link_re().replace_all(text, "").into_owned();
        rewritten = get_font_preload_marker_re()
            .replace_all(&rewritten, "")
            .into_owned();

        loop {
            let collapsed = get_blank_lines_re().replace_all(&rewritten, "\n\n");
            if collapsed == rewritten {
                break;
            }
            rewritten = collapsed.into_owned();
        }

        Outcome::changed(
            rewritten,
            format!("removed {link_count} font preload links"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RewriteEngine;

    fn table() -> DimensionTable {
        DimensionTable::builtin()
    }

    #[test]
    fn scan_tags_tracks_quotes() {
        let html = r#"<p><img src="a>b.webp" alt="x"></p>"#;
        let spans = scan_tags(html, "img");
        assert_eq!(spans.len(), 1);
        assert_eq!(&html[spans[0].start..spans[0].end], r#"<img src="a>b.webp" alt="x">"#);
    }

    #[test]
    fn scan_tags_ignores_longer_names() {
        assert!(scan_tags("<imgx src=\"a\">", "img").is_empty());
    }

    #[test]
    fn unclosed_tag_is_skipped() {
        let rule = ImageDimensionsRule::new(table());
        assert!(matches!(
            rule.apply("<img src=\"logo_sito_franco.webp\""),
            Outcome::Unchanged
        ));
    }

    #[test]
    fn adds_both_dimensions_for_known_logo() {
        let rule = ImageDimensionsRule::new(table());
        let html = r#"<img src="img/logo_sito_franco.webp" alt="logo">"#;
        match rule.apply(html) {
            Outcome::Changed { text, descriptions } => {
                assert_eq!(
                    text,
                    r#"<img src="img/logo_sito_franco.webp" alt="logo" width="50" height="50">"#
                );
                assert_eq!(descriptions.len(), 1);
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn keeps_existing_dimensions_any_order() {
        let rule = ImageDimensionsRule::new(table());
        let html = r#"<img height="10" src="logo_sito_franco.webp" width="10">"#;
        assert!(matches!(rule.apply(html), Outcome::Unchanged));
    }

    #[test]
    fn completes_only_the_missing_attribute() {
        let rule = ImageDimensionsRule::new(table());
        let html = r#"<img src="allarmi.webp" width="80">"#;
        match rule.apply(html) {
            Outcome::Changed { text, .. } => {
                assert_eq!(text, r#"<img src="allarmi.webp" width="80" height="80">"#);
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn self_closing_tag_insertion() {
        let rule = ImageDimensionsRule::new(table());
        let html = r#"<img src="esperienza.webp" />"#;
        match rule.apply(html) {
            Outcome::Changed { text, .. } => {
                assert_eq!(text, r#"<img src="esperienza.webp" width="80" height="80" />"#);
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn image_rule_is_idempotent() {
        let rule = ImageDimensionsRule::new(table());
        let html = r#"<img src="tecnologie.webp">"#;
        let Outcome::Changed { text, .. } = rule.apply(html) else {
            panic!("expected a change");
        };
        assert!(matches!(rule.apply(&text), Outcome::Unchanged));
    }

    #[test]
    fn font_preload_after_viewport() {
        let html = "<html><head>\n    <meta name=\"viewport\" content=\"width=device-width\">\n</head><body></body></html>";
        match FontPreloadRule.apply(html) {
            Outcome::Changed { text, .. } => {
                let meta_end = text.find("device-width\">").map(|p| p + 14).unwrap();
                assert!(text[meta_end..].trim_start().starts_with(FONT_PRELOAD_MARKER));
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn font_preload_without_viewport_goes_to_head_start() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        match FontPreloadRule.apply(html) {
            Outcome::Changed { text, .. } => {
                let head_end = text.find("<head>").map(|p| p + 6).unwrap();
                assert!(text[head_end..].trim_start().starts_with(FONT_PRELOAD_MARKER));
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn font_preload_requires_head() {
        assert!(matches!(
            FontPreloadRule.apply("<body>no head here</body>"),
            Outcome::Unchanged
        ));
    }

    #[test]
    fn font_preload_is_idempotent() {
        let html = "<html><head></head><body></body></html>";
        let Outcome::Changed { text, .. } = FontPreloadRule.apply(html) else {
            panic!("expected a change");
        };
        assert!(matches!(FontPreloadRule.apply(&text), Outcome::Unchanged));
    }

    #[test]
    fn stability_block_lands_before_head_close() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        match LayoutStabilityRule.apply(html) {
            Outcome::Changed { text, .. } => {
                let block_pos = text.find(STABILITY_SENTINEL).unwrap();
                let head_pos = text.find("</head>").unwrap();
                assert!(block_pos < head_pos);
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn stability_rule_is_idempotent() {
        let html = "<html><head></head></html>";
        let Outcome::Changed { text, .. } = LayoutStabilityRule.apply(html) else {
            panic!("expected a change");
        };
        assert!(matches!(LayoutStabilityRule.apply(&text), Outcome::Unchanged));
    }

    #[test]
    fn strip_removes_links_and_collapses_blanks() {
        let html = concat!(
            "<head>\n",
            "    <!-- Critical font preload to prevent CLS -->\n",
            "    <link rel=\"preload\" href=\"https://fonts.gstatic.com/s/inter/v12/a.woff2\" as=\"font\" crossorigin>\n",
            "    <link rel=\"preload\" href=\"https://fonts.gstatic.com/s/inter/v12/b.woff2\" as=\"font\" crossorigin>\n",
            "</head>\n<body>\ntext\n\n\n\nmore\n</body>"
        );
        match StripFontPreloadsRule.apply(html) {
            Outcome::Changed { text, descriptions } => {
                assert!(!text.contains("fonts.gstatic.com"));
                assert!(!text.contains(FONT_PRELOAD_MARKER));
                assert!(text.contains("text\n\nmore"));
                assert_eq!(descriptions, vec!["removed 2 font preload links".to_owned()]);
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn strip_without_preloads_leaves_blanks_alone() {
        let html = "a\n\n\n\nb";
        assert!(matches!(StripFontPreloadsRule.apply(html), Outcome::Unchanged));
    }

    #[test]
    fn insert_then_strip_round_trip() {
        let html = "<html><head><meta name=\"viewport\" content=\"w\">\n</head><body></body></html>";
        let engine = RewriteEngine::new(vec![
            Box::new(FontPreloadRule),
            Box::new(StripFontPreloadsRule),
        ]);
        let report = engine.run(html);
        // Insertion happened first, so the strip rule sees and removes it.
        assert_eq!(report.changes.len(), 2);
        assert!(!report.text.contains("fonts.gstatic.com"));
    }
}
