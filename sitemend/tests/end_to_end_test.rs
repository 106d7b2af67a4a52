//! End-to-end scenario: one pass of the HTML rule set over a page that
//! needs all three layout-shift fixes.

use sitemend::commands::{run_fix, FixOptions};
use sitemend::config::Config;
use sitemend::constants::{FONT_PRELOAD_MARKER, STABILITY_SENTINEL};
use std::fs;
use tempfile::TempDir;

const PAGE: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
    <meta charset=\"utf-8\">\n\
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
    <title>Home</title>\n\
</head>\n\
<body>\n\
    <img src=\"img/logo_sito_franco.webp\" alt=\"logo\">\n\
</body>\n\
</html>\n";

#[test]
fn single_pass_applies_every_fix_once() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("index.html");
    fs::write(&file, PAGE).unwrap();

    let options = FixOptions {
        apply: true,
        ..FixOptions::default()
    };
    let mut buffer = Vec::new();
    let results = run_fix(&[file.clone()], &options, &Config::default(), &mut buffer).unwrap();

    assert_eq!(results.len(), 1);
    let rules: Vec<&str> = results[0].changes.iter().map(|c| c.rule).collect();
    assert_eq!(
        rules,
        vec!["image-dimensions", "font-preload", "layout-stability"]
    );

    let rewritten = fs::read_to_string(&file).unwrap();

    // Image gained both dimension attributes.
    assert!(rewritten.contains(
        r#"<img src="img/logo_sito_franco.webp" alt="logo" width="50" height="50">"#
    ));

    // Preload links inserted exactly once, after the viewport meta tag.
    assert_eq!(rewritten.matches(FONT_PRELOAD_MARKER).count(), 1);
    let viewport = rewritten.find("viewport").unwrap();
    let marker = rewritten.find(FONT_PRELOAD_MARKER).unwrap();
    assert!(marker > viewport);

    // Stability block inserted exactly once, immediately before </head>.
    assert_eq!(rewritten.matches(STABILITY_SENTINEL).count(), 1);
    assert!(rewritten.contains("</style>\n</head>"));
}

#[test]
fn second_pass_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("index.html");
    fs::write(&file, PAGE).unwrap();

    let options = FixOptions {
        apply: true,
        ..FixOptions::default()
    };
    run_fix(&[file.clone()], &options, &Config::default(), &mut Vec::new()).unwrap();
    let after_first = fs::read_to_string(&file).unwrap();

    let results =
        run_fix(&[file.clone()], &options, &Config::default(), &mut Vec::new()).unwrap();
    assert!(results[0].changes.is_empty());
    assert_eq!(fs::read_to_string(&file).unwrap(), after_first);
}

#[test]
fn batch_continues_past_pages_with_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    let inert = dir.path().join("about.html");
    // Already carries dimensions, the marker, and the stability block.
    fs::write(
        &dir.path().join("index.html"),
        PAGE,
    )
    .unwrap();
    fs::write(
        &inert,
        format!(
            "<html><head>{FONT_PRELOAD_MARKER}<style>/* {STABILITY_SENTINEL} */</style>\
             </head><body><img src=\"a.webp\" width=\"1\" height=\"1\"></body></html>"
        ),
    )
    .unwrap();

    let mut buffer = Vec::new();
    let results = run_fix(
        &[dir.path().to_path_buf()],
        &FixOptions::default(),
        &Config::default(),
        &mut buffer,
    )
    .unwrap();

    assert_eq!(results.len(), 2);
    let inert_result = results
        .iter()
        .find(|r| r.file.ends_with("about.html"))
        .unwrap();
    assert!(inert_result.changes.is_empty());
    let busy_result = results
        .iter()
        .find(|r| r.file.ends_with("index.html"))
        .unwrap();
    assert_eq!(busy_result.changes.len(), 3);
}
