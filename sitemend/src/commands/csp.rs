//! CSP hash calculation command.

use crate::config::Config;
use crate::csp::{build_policy, extract_inline_scripts, script_hash};
use crate::output;
use crate::utils::{collect_files, normalize_display_path};

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Options for the csp command.
#[derive(Debug, Default)]
pub struct CspOptions {
    /// Output raw JSON.
    pub json: bool,
    /// Verbose diagnostics on stderr.
    pub verbose: bool,
    /// Show only the policy line.
    pub quiet: bool,
    /// Folders to exclude from directory walks.
    pub exclude: Vec<String>,
}

/// Compute inline-script hashes for the target HTML files and print the
/// aggregated Content-Security-Policy header value.
///
/// # Errors
///
/// Returns an error if writing to the output fails. Unreadable files are
/// reported and skipped.
pub fn run_csp<W: Write>(
    paths: &[PathBuf],
    options: &CspOptions,
    config: &Config,
    mut writer: W,
) -> Result<String> {
    let files = collect_files(paths, &["html", "htm"], &options.exclude);

    let mut rows: Vec<(String, usize, String)> = Vec::new();
    let mut hashes = BTreeSet::new();

    for file in &files {
        let display = normalize_display_path(file);
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                writeln!(writer, "  {} {display}: {e}", "Skip:".yellow())?;
                continue;
            }
        };

        let scripts = extract_inline_scripts(&content);
        if options.verbose {
            eprintln!("[VERBOSE] {display}: {} inline scripts", scripts.len());
        }
        for (index, script) in scripts.iter().enumerate() {
            let hash = script_hash(script);
            rows.push((display.clone(), index + 1, hash.clone()));
            hashes.insert(hash);
        }
    }

    let policy = build_policy(&hashes, &config.sitemend.csp.extra_script_src);

    if options.json {
        let files_json: Vec<_> = rows
            .iter()
            .map(|(file, index, hash)| json!({ "file": file, "script": index, "hash": hash }))
            .collect();
        let payload = json!({ "scripts": files_json, "policy": policy });
        writeln!(writer, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(policy);
    }

    if !options.quiet {
        output::print_header(&mut writer, "Inline script hashes")?;
        if rows.is_empty() {
            writeln!(writer, "No inline scripts found.")?;
        } else {
            writeln!(writer, "{}", output::csp_table(&rows))?;
        }
        writeln!(writer)?;
        writeln!(
            writer,
            "{} {} unique hashes",
            "Total:".cyan().bold(),
            hashes.len()
        )?;
        writeln!(writer)?;
    }

    writeln!(writer, "Content-Security-Policy: {policy}")?;
    Ok(policy)
}
