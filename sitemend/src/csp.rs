//! Content-Security-Policy hash calculation for inline scripts.
//!
//! Browsers match a `script-src` hash against the exact bytes between the
//! script tags, so bodies are trimmed the same way here as when they were
//! authored into the allowlist.

use crate::constants::{get_script_element_re, CSP_POLICY_TAIL, CSP_SCRIPT_ORIGINS, EMPTY_SCRIPT_HASH};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// Extract the bodies of inline `<script>` elements.
///
/// Elements with a `src` attribute and JSON-LD data blocks are not subject
/// to script-src hashing and are skipped; empty bodies are dropped.
#[must_use]
pub fn extract_inline_scripts(html: &str) -> Vec<String> {
    get_script_element_re()
        .captures_iter(html)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
            if attrs.contains("src=") || attrs.contains("application/ld+json") {
                return None;
            }
            let body = caps.get(2).map_or("", |m| m.as_str()).trim();
            if body.is_empty() {
                None
            } else {
                Some(body.to_owned())
            }
        })
        .collect()
}

/// SHA-256 of a trimmed script body, Base64-encoded the way CSP expects.
#[must_use]
pub fn script_hash(body: &str) -> String {
    let digest = Sha256::digest(body.trim().as_bytes());
    STANDARD.encode(digest)
}

/// Render the `script-src` source list for the given hashes.
///
/// The empty-script hash is always present, the rest are sorted and
/// deduplicated; configured extra origins follow the built-in ones.
#[must_use]
pub fn build_script_src(hashes: &BTreeSet<String>, extra_origins: &[String]) -> String {
    let mut parts = vec!["'self'".to_owned(), format!("'sha256-{EMPTY_SCRIPT_HASH}'")];
    for hash in hashes {
        if hash != EMPTY_SCRIPT_HASH {
            parts.push(format!("'sha256-{hash}'"));
        }
    }
    for origin in CSP_SCRIPT_ORIGINS {
        parts.push((*origin).to_owned());
    }
    for origin in extra_origins {
        parts.push(origin.clone());
    }
    parts.join(" ")
}

/// Render the complete Content-Security-Policy header value.
#[must_use]
pub fn build_policy(hashes: &BTreeSet<String>, extra_origins: &[String]) -> String {
    format!(
        "default-src 'self'; script-src {}; {}",
        build_script_src(hashes, extra_origins),
        CSP_POLICY_TAIL
    )
}
