//! Preload usage audit command.

use crate::audit::audit_preloads;
use crate::utils::{collect_files, normalize_display_path};

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Options for the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output raw JSON.
    pub json: bool,
    /// Verbose diagnostics on stderr.
    pub verbose: bool,
    /// Show only the summary.
    pub quiet: bool,
    /// Folders to exclude from directory walks.
    pub exclude: Vec<String>,
}

/// Audit preload declarations in the target HTML files.
///
/// Returns the number of issues found; the caller decides whether that
/// fails the run.
///
/// # Errors
///
/// Returns an error if writing to the output fails. Unreadable files are
/// reported and skipped.
pub fn run_check<W: Write>(
    paths: &[PathBuf],
    options: &CheckOptions,
    mut writer: W,
) -> Result<usize> {
    let files = collect_files(paths, &["html", "htm"], &options.exclude);

    let mut issues: Vec<(String, String)> = Vec::new();
    for file in &files {
        let display = normalize_display_path(file);
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                writeln!(writer, "  {} {display}: {e}", "Skip:".yellow())?;
                continue;
            }
        };

        for issue in audit_preloads(&content) {
            issues.push((display.clone(), issue));
        }
    }

    if options.json {
        let payload: Vec<_> = issues
            .iter()
            .map(|(file, issue)| json!({ "file": file, "issue": issue }))
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&payload)?)?;
        return Ok(issues.len());
    }

    if issues.is_empty() {
        writeln!(writer, "{}", "All preloads are referenced.".green())?;
    } else {
        if !options.quiet {
            for (file, issue) in &issues {
                writeln!(writer, "{} {file}: {issue}", "Issue:".red().bold())?;
            }
        }
        writeln!(
            writer,
            "{} {} unused preloads across {} files",
            "Summary:".cyan().bold(),
            issues.len(),
            files.len()
        )?;
    }

    Ok(issues.len())
}
