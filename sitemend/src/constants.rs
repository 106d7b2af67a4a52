use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Config file searched for in the target directory and its parents.
pub const CONFIG_FILENAME: &str = ".sitemend.toml";
/// Alternative config file name without the leading dot.
pub const CONFIG_FILENAME_ALT: &str = "sitemend.toml";

/// SHA-256/Base64 hash of the empty script body. Always part of the CSP
/// allowlist so pages with empty inline scripts keep loading.
pub const EMPTY_SCRIPT_HASH: &str = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

/// Sentinel text that marks the layout-stability style block as present.
pub const STABILITY_SENTINEL: &str = "CLS Prevention";

/// Comment line introducing the inserted font preload links.
pub const FONT_PRELOAD_MARKER: &str = "<!-- Critical font preload to prevent CLS -->";

/// Font preload links inserted after the viewport meta tag.
pub const FONT_PRELOAD_SNIPPET: &str = r#"
    <!-- Critical font preload to prevent CLS -->
    <link rel="preload" href="https://fonts.gstatic.com/s/inter/v12/UcCO3FwrK3iLTeHuS_fvQtMwCp50KnMw2boKoduKmMEVuLyfAZ9hiA.woff2" as="font" type="font/woff2" crossorigin>
    <link rel="preload" href="https://fonts.gstatic.com/s/inter/v12/UcCO3FwrK3iLTeHuS_fvQtMwCp50KnMw2boKoduKmMEVuBWYAZ9hiA.woff2" as="font" type="font/woff2" crossorigin>"#;

/// Style block inserted before `</head>` to pin layout-critical sizes.
pub const STABILITY_STYLE_BLOCK: &str = r"
<style>
/* CLS Prevention Styles */
.logo-image {
    width: 50px !important;
    height: 50px !important;
    display: block;
}

.service-icon img {
    width: 80px !important;
    height: 80px !important;
    display: block;
}

.hero-container {
    min-height: 60vh;
    display: flex;
    flex-direction: column;
    justify-content: center;
    contain: layout style;
}

.nav-menu {
    min-height: 40px;
    contain: layout style;
}

img {
    display: block;
    max-width: 100%;
    height: auto;
}

.partnership-carousel {
    min-height: 160px;
    contain: layout style;
}

.allarmi-carousel .carousel-container {
    min-height: 400px;
    contain: layout style;
}
</style>
";

/// Regex matching one inserted/legacy Inter font preload line.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_font_preload_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(
            r#"[ \t]*<link rel="preload" href="https://fonts\.gstatic\.com/s/inter/[^>]+>[ \t]*\r?\n?"#,
        )
        .expect("Invalid font preload regex pattern")
    })
}

/// Regex matching the marker comment above the inserted preload links.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_font_preload_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"[ \t]*<!-- Critical font preload to prevent CLS -->[ \t]*\r?\n?")
            .expect("Invalid preload marker regex pattern")
    })
}

/// Regex matching a run of three or more newlines (blank-line pileup).
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("Invalid blank lines regex pattern")
    })
}

/// Regex matching the viewport meta tag.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_viewport_meta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r#"<meta name="viewport"[^>]*>"#).expect("Invalid viewport regex pattern")
    })
}

/// Regex matching the opening `<head>` tag.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_head_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"(?i)<head[^>]*>").expect("Invalid head regex pattern"))
}

/// Regex matching CSS block comments, including edge cases like `/**/`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/").expect("Invalid CSS comment regex pattern")
    })
}

/// Regex matching any whitespace run.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_whitespace_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"))
}

/// Regex matching whitespace around CSS structural punctuation.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_punct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"\s*([{}:;,>+~])\s*").expect("Invalid CSS punctuation regex pattern")
    })
}

/// Regex matching whitespace around brackets and parentheses.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"\s*([()\[\]])\s*").expect("Invalid bracket regex pattern"))
}

/// Regex matching a redundant trailing semicolon before `}`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_trailing_semicolon_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r";\s*}").expect("Invalid trailing semicolon regex pattern"))
}

/// Regex matching a zero-with-unit token, with its delimiters captured.
///
/// The regex crate has no lookaround, so both delimiters are captured and
/// restored; callers must apply this to a fixed point (a match consumes the
/// delimiter the next candidate would need).
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_zero_unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(
            r"([:\s,(])0+\.?0*(?:px|em|rem|vh|vw|pt|pc|in|cm|mm|ex|ch|vmin|vmax|%)([;\s,})]|$)",
        )
        .expect("Invalid zero unit regex pattern")
    })
}

/// Regex matching a six-digit hex color.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"#([0-9a-fA-F]{6})\b").expect("Invalid hex color regex pattern")
    })
}

/// Regex matching a quoted single-family `font-family` value.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_css_font_family_quote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r#"font-family:["']([^"',]+)["']"#).expect("Invalid font-family regex pattern")
    })
}

/// Regex matching any `<link rel="preload">` tag, capturing its href.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_preload_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<link[^>]*rel=["']preload["'][^>]*href=["']([^"']*)["'][^>]*>"#)
            .expect("Invalid preload link regex pattern")
    })
}

/// Regex matching a `<script …>…</script>` element, capturing the attribute
/// text and the body. Whether the element counts as inline is decided by
/// the caller from the captured attributes.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_script_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script([^>]*)>(.*?)</script>")
            .expect("Invalid script element regex pattern")
    })
}

/// Keywords in an image filename that mark it as a service icon.
pub fn get_service_icon_keywords() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("allarmi");
        s.insert("sorveglianza");
        s.insert("serramenti");
        s.insert("nebbiogeni");
        s.insert("assistenza");
        s.insert("esperienza");
        s.insert("tecnologie");
        s
    })
}

/// Folders excluded from file collection by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert("node_modules");
        s.insert("dist");
        s.insert("build");
        s.insert("vendor");
        s.insert(".cache");
        s
    })
}

/// Extension to MIME type table used by the static file server.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("txt", "text/plain"),
    ("xml", "application/xml"),
];

/// Security headers injected on every server response.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "Strict-Transport-Security",
        "max-age=31536000; includeSubDomains; preload",
    ),
    ("X-Frame-Options", "SAMEORIGIN"),
    ("X-Content-Type-Options", "nosniff"),
    ("X-XSS-Protection", "1; mode=block"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
];

/// Default Content-Security-Policy header for the local server.
pub const DEFAULT_SERVER_CSP: &str = "default-src 'self'; script-src 'self' 'unsafe-inline' https://fonts.googleapis.com; style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; font-src 'self' https://fonts.gstatic.com; img-src 'self' data:; connect-src 'self'";

/// External origins allowed in the generated `script-src` directive.
pub const CSP_SCRIPT_ORIGINS: &[&str] = &[
    "https://www.googletagmanager.com",
    "https://www.google-analytics.com",
    "https://ssl.google-analytics.com",
    "https://fonts.googleapis.com",
    "https://tagmanager.google.com",
];

/// Trailing directives of the generated policy, after `script-src`.
pub const CSP_POLICY_TAIL: &str = "style-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://tagmanager.google.com; font-src 'self' https://fonts.gstatic.com; img-src 'self' data: https://www.google-analytics.com https://ssl.google-analytics.com https://www.googletagmanager.com https://region1.google-analytics.com https://stats.g.doubleclick.net; connect-src 'self' https://www.google-analytics.com https://ssl.google-analytics.com https://www.googletagmanager.com https://region1.google-analytics.com https://analytics.google.com https://stats.g.doubleclick.net; object-src 'none'; base-uri 'self'; form-action 'self'; frame-ancestors 'none'; upgrade-insecure-requests";
