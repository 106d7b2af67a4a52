//! Tests for the minification rules: size, token safety, idempotence.

use sitemend::rules::css::minify_css;
use sitemend::rules::js::minify_js;

const CSS_FIXTURE: &str = "\
/* Layout section */
.hero-container {
    min-height: 60vh;
    margin: 0px;
    color: #ffffff;
}

/* Navigation */
.nav-menu a {
    padding: 0em 1rem;
    background: #aabbcc;
}
";

const JS_FIXTURE: &str = "\
// Carousel bootstrap
function startCarousel(root) {
    /* defaults */
    let running = true;
    let delay = 300;
    const label = \"auto  play\";
    if (running === false) {
        return null;
    }
    return { root, delay, label };
}
";

#[test]
fn css_minification_strictly_shrinks() {
    let minified = minify_css(CSS_FIXTURE);
    assert!(minified.len() < CSS_FIXTURE.len());
    assert!(!minified.contains("/*"));
    assert!(!minified.contains('\n'));
}

#[test]
fn css_minification_preserves_token_order() {
    let minified = minify_css(CSS_FIXTURE);
    // Selectors keep their combinator spacing; identifiers never merge.
    assert!(minified.contains(".nav-menu a{"));
    assert!(minified.contains("min-height:60vh"));
    assert!(minified.contains("padding:0 1rem"));
    assert!(minified.contains("color:#fff"));
    assert!(minified.contains("background:#abc"));
}

#[test]
fn css_minification_is_idempotent() {
    let once = minify_css(CSS_FIXTURE);
    assert_eq!(minify_css(&once), once);
}

#[test]
fn js_minification_strictly_shrinks() {
    let minified = minify_js(JS_FIXTURE);
    assert!(minified.len() < JS_FIXTURE.len());
    assert!(!minified.contains("Carousel bootstrap"));
    assert!(!minified.contains("defaults"));
}

#[test]
fn js_minification_never_merges_identifiers() {
    let minified = minify_js(JS_FIXTURE);
    assert!(minified.contains("function startCarousel(root)"));
    assert!(minified.contains("let running="));
    assert!(minified.contains("return null"));
    assert!(!minified.contains("returnnull"));
    assert!(!minified.contains("letrunning"));
}

#[test]
fn js_minification_keeps_string_literals_byte_identical() {
    let minified = minify_js(JS_FIXTURE);
    assert!(minified.contains("\"auto  play\""));
}

#[test]
fn js_boolean_shortening_is_token_aware() {
    let minified = minify_js(JS_FIXTURE);
    assert!(minified.contains("let running=!0"));
    assert!(minified.contains("===!1"));

    // The words inside string literals survive untouched.
    let tricky = minify_js("let s = \"true or false\"; let b = true;");
    assert!(tricky.contains("\"true or false\""));
    assert!(tricky.contains("b=!0"));
}

#[test]
fn js_minification_is_idempotent() {
    let once = minify_js(JS_FIXTURE);
    assert_eq!(minify_js(&once), once);
}
