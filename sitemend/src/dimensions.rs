//! Image dimension lookup table.
//!
//! The attribute-completion rule never guesses from pixels; it resolves
//! sizes from a table injected at construction time, so tests can run with
//! fixture tables instead of the production one. Resolution order: exact
//! substring match on the filename, then keyword heuristics, then the
//! global default.

use crate::constants::get_service_icon_keywords;
use serde::Deserialize;

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Intrinsic width.
    pub width: u32,
    /// Intrinsic height.
    pub height: u32,
}

impl Dimensions {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One table entry: any filename containing `pattern` resolves to the size.
#[derive(Debug, Clone, Deserialize)]
pub struct SizeEntry {
    /// Substring matched against the image filename.
    #[serde(rename = "match")]
    pub pattern: String,
    /// Resolved width.
    pub width: u32,
    /// Resolved height.
    pub height: u32,
}

/// Filename-substring to dimensions mapping with heuristic fallbacks.
#[derive(Debug, Clone)]
pub struct DimensionTable {
    entries: Vec<SizeEntry>,
    default: Dimensions,
}

/// Sizes of the site's known images, keyed by filename substring.
const BUILTIN_SIZES: &[(&str, u32, u32)] = &[
    ("logo_sito_franco.webp", 50, 50),
    ("logo_sito_franco_small.webp", 50, 50),
    ("CIVIS-copertina-optimized.webp", 800, 600),
    ("placeholder1-svg-ITLgroup-optimized.webp", 400, 300),
    ("placeholder2-svg-ITLgroup-optimized.webp", 400, 300),
    ("thumbnail-xecur-super-optimized.webp", 320, 240),
    ("assistenza.webp", 80, 80),
    ("esperienza.webp", 80, 80),
    ("tecnologie.webp", 80, 80),
    ("allarmi.webp", 80, 80),
    ("sorveglianza.webp", 80, 80),
    ("serramenti.webp", 80, 80),
    ("nebbiogeni.webp", 80, 80),
];

impl Default for DimensionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DimensionTable {
    /// Table with the production entries and the 300x200 default.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_SIZES
            .iter()
            .map(|&(pattern, width, height)| SizeEntry {
                pattern: pattern.to_owned(),
                width,
                height,
            })
            .collect();
        Self {
            entries,
            default: Dimensions::new(300, 200),
        }
    }

    /// Table with only the given entries and default; no built-ins.
    #[must_use]
    pub fn with_entries(entries: Vec<SizeEntry>, default: Dimensions) -> Self {
        Self { entries, default }
    }

    /// Built-in table extended with caller entries. Caller entries are
    /// consulted first so they can override a built-in pattern.
    #[must_use]
    pub fn builtin_extended(extra: Vec<SizeEntry>, default: Option<Dimensions>) -> Self {
        let mut table = Self::builtin();
        let mut entries = extra;
        entries.append(&mut table.entries);
        table.entries = entries;
        if let Some(default) = default {
            table.default = default;
        }
        table
    }

    /// Resolve dimensions for an image filename.
    #[must_use]
    pub fn lookup(&self, filename: &str) -> Dimensions {
        for entry in &self.entries {
            if filename.contains(entry.pattern.as_str()) {
                return Dimensions::new(entry.width, entry.height);
            }
        }

        let lowered = filename.to_lowercase();
        if lowered.contains("logo") {
            return Dimensions::new(50, 50);
        }
        if lowered.contains("icon")
            || get_service_icon_keywords()
                .iter()
                .any(|kw| filename.contains(kw))
        {
            return Dimensions::new(80, 80);
        }
        if lowered.contains("placeholder") || lowered.contains("copertina") {
            return Dimensions::new(400, 300);
        }

        self.default
    }
}
