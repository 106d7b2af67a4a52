//! CSS minification rule.
//!
//! A fixed sequence of substitutions. The order is a precondition, not an
//! accident: punctuation tightening assumes whitespace was already
//! collapsed, and the font-family unquoting assumes no space remains after
//! the colon.

use crate::constants::{
    get_css_bracket_re, get_css_comment_re, get_css_font_family_quote_re, get_css_hex_color_re,
    get_css_punct_re, get_css_trailing_semicolon_re, get_css_zero_unit_re, get_whitespace_run_re,
};
use crate::engine::{Outcome, Rule};

/// Minify a stylesheet.
#[must_use]
pub fn minify_css(css: &str) -> String {
    // 1. Comments.
    let mut out = get_css_comment_re().replace_all(css, "").into_owned();
    // 2. Whitespace runs to a single space.
    out = get_whitespace_run_re().replace_all(&out, " ").into_owned();
    // 3. No space around structural punctuation and brackets.
    out = get_css_punct_re().replace_all(&out, "$1").into_owned();
    out = get_css_bracket_re().replace_all(&out, "$1").into_owned();
    // 4. Redundant trailing semicolons.
    out = get_css_trailing_semicolon_re()
        .replace_all(&out, "}")
        .into_owned();
    out = out.trim().to_owned();

    // 5. Zero-with-unit tokens. A match consumes the delimiter the next
    //    candidate needs, so run to a fixed point.
    loop {
        let next = get_css_zero_unit_re()
            .replace_all(&out, "${1}0${2}")
            .into_owned();
        if next == out {
            break;
        }
        out = next;
    }

    // 6. Hex colors, shortened only when lossless.
    out = get_css_hex_color_re()
        .replace_all(&out, |caps: &regex::Captures<'_>| {
            let hex = &caps[1];
            let b = hex.as_bytes();
            if b[0].eq_ignore_ascii_case(&b[1])
                && b[2].eq_ignore_ascii_case(&b[3])
                && b[4].eq_ignore_ascii_case(&b[5])
            {
                format!("#{}{}{}", &hex[..1], &hex[2..3], &hex[4..5])
            } else {
                format!("#{hex}")
            }
        })
        .into_owned();

    // 7. Single-family font names need no quotes.
    out = get_css_font_family_quote_re()
        .replace_all(&out, "font-family:$1")
        .into_owned();

    out
}

/// Whitespace/token-collapse rule for stylesheets.
pub struct CssMinifyRule;

impl Rule for CssMinifyRule {
    fn name(&self) -> &'static str {
        "css-minify"
    }

    fn apply(&self, text: &str) -> Outcome {
        let minified = minify_css(text);
        if minified == text {
            return Outcome::Unchanged;
        }
        let description = format!(
            "minified stylesheet: {} -> {} bytes",
            text.len(),
            minified.len()
        );
        Outcome::changed(minified, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_whitespace() {
        let css = "/* header */\nbody {\n    margin: 0px;\n    color: #ffffff;\n}\n";
        assert_eq!(minify_css(css), "body{margin:0;color:#fff}");
    }

    #[test]
    fn keeps_descendant_combinator_space() {
        let css = ".nav li { color: red; }";
        assert_eq!(minify_css(css), ".nav li{color:red}");
    }

    #[test]
    fn zero_units_collapse_even_adjacent() {
        let css = "p { margin: 0px 0em 0rem 0%; }";
        assert_eq!(minify_css(css), "p{margin:0 0 0 0}");
    }

    #[test]
    fn fractional_and_nonzero_values_survive() {
        let css = "p { margin: 0.5em; top: 10px; }";
        assert_eq!(minify_css(css), "p{margin:0.5em;top:10px}");
    }

    #[test]
    fn hex_shortening_is_lossless_only() {
        assert_eq!(minify_css("a { color: #aabbcc; }"), "a{color:#abc}");
        assert_eq!(minify_css("a { color: #aabbcd; }"), "a{color:#aabbcd}");
    }

    #[test]
    fn font_family_quotes_dropped_for_single_family() {
        assert_eq!(
            minify_css("body { font-family: 'Inter'; }"),
            "body{font-family:Inter}"
        );
        // Multi-family lists keep their quotes (comma spacing collapses
        // with the rest of the punctuation pass).
        assert_eq!(
            minify_css("body { font-family: 'Inter, sans-serif'; }"),
            "body{font-family:'Inter,sans-serif'}"
        );
    }

    #[test]
    fn minify_is_idempotent() {
        let css = "/* c */ .a > .b { padding: 0px ; }\n\n.c { background: #112233 }";
        let once = minify_css(css);
        assert_eq!(minify_css(&once), once);
    }

    #[test]
    fn rule_reports_size_change() {
        let rule = CssMinifyRule;
        match rule.apply("body {  margin: 0px; }") {
            Outcome::Changed { text, descriptions } => {
                assert_eq!(text, "body{margin:0}");
                assert_eq!(descriptions.len(), 1);
                assert!(descriptions[0].starts_with("minified stylesheet:"));
            }
            Outcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn rule_is_noop_on_minified_input() {
        let rule = CssMinifyRule;
        assert!(matches!(rule.apply("body{margin:0}"), Outcome::Unchanged));
    }
}
