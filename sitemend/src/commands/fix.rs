//! HTML fix-up command.

use crate::config::Config;
use crate::engine::{Change, RewriteEngine, RuleSet};
use crate::output;
use crate::rules::html::{
    FontPreloadRule, ImageDimensionsRule, LayoutStabilityRule, StripFontPreloadsRule,
};
use crate::utils::{collect_files, normalize_display_path};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Options for the fix command.
#[derive(Debug, Default)]
pub struct FixOptions {
    /// Write rewritten files back to disk; dry-run otherwise.
    pub apply: bool,
    /// Run the image dimension completion rule.
    pub dimensions: bool,
    /// Run the font preload insertion rule.
    pub font_preload: bool,
    /// Run the layout stability insertion rule.
    pub stability: bool,
    /// Run the preload removal rule.
    pub strip_preloads: bool,
    /// Output raw JSON.
    pub json: bool,
    /// Verbose diagnostics on stderr.
    pub verbose: bool,
    /// Show only the summary.
    pub quiet: bool,
    /// Folders to exclude from directory walks.
    pub exclude: Vec<String>,
}

/// Outcome of fixing one file.
#[derive(Debug, Serialize)]
pub struct FileFixResult {
    /// File that was processed.
    pub file: String,
    /// Change log of the engine run.
    pub changes: Vec<Change>,
    /// Whether the rewritten text was written back.
    pub applied: bool,
}

/// Build the HTML rule set for the selected flags, in the fixed order the
/// rules were designed for: tag-level edits first, scaffold insertions
/// second, removals last so they see everything inserted before them.
fn build_rule_set(options: &FixOptions, config: &Config) -> RuleSet {
    let run_default = !(options.dimensions
        || options.font_preload
        || options.stability
        || options.strip_preloads);

    let mut rules: RuleSet = Vec::new();
    if options.dimensions || run_default {
        rules.push(Box::new(ImageDimensionsRule::new(
            config.sitemend.dimension_table(),
        )));
    }
    if options.font_preload || run_default {
        rules.push(Box::new(FontPreloadRule));
    }
    if options.stability || run_default {
        rules.push(Box::new(LayoutStabilityRule));
    }
    if options.strip_preloads {
        rules.push(Box::new(StripFontPreloadsRule));
    }
    rules
}

/// Run the HTML fix-up rules over the target paths.
///
/// # Errors
///
/// Returns an error if writing to the output fails. Per-file read/write
/// problems are reported and skipped; a missing or inert file never stops
/// the batch.
pub fn run_fix<W: Write>(
    paths: &[PathBuf],
    options: &FixOptions,
    config: &Config,
    mut writer: W,
) -> Result<Vec<FileFixResult>> {
    let files = collect_files(paths, &["html", "htm"], &options.exclude);
    let engine = RewriteEngine::new(build_rule_set(options, config));

    if options.verbose {
        eprintln!("[VERBOSE] sitemend v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] rules: {:?}", engine.rule_names());
        eprintln!("[VERBOSE] {} files to process", files.len());
    }

    if files.is_empty() {
        if !options.json {
            writeln!(writer, "No HTML files found.")?;
        }
        return Ok(Vec::new());
    }
    let progress = output::create_progress_bar(files.len() as u64);

    let mut outcomes: Vec<(PathBuf, std::io::Result<crate::engine::RewriteReport>)> = files
        .par_iter()
        .map(|file| {
            let outcome = fs::read_to_string(file).map(|content| engine.run(&content));
            progress.inc(1);
            (file.clone(), outcome)
        })
        .collect();
    progress.finish_and_clear();
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut results = Vec::new();
    for (file, outcome) in outcomes {
        let display = normalize_display_path(&file);
        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                writeln!(writer, "  {} {display}: {e}", "Skip:".yellow())?;
                continue;
            }
        };

        let mut applied = false;
        if options.apply && !report.is_unchanged() {
            match fs::write(&file, &report.text) {
                Ok(()) => applied = true,
                Err(e) => {
                    writeln!(writer, "  {} {display}: {e}", "Write failed:".red())?;
                }
            }
        }

        if !options.json && !options.quiet {
            output::print_changes(&mut writer, &display, &report.changes)?;
        }

        results.push(FileFixResult {
            file: display,
            changes: report.changes,
            applied,
        });
    }

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        let changed = results.iter().filter(|r| !r.changes.is_empty()).count();
        let total: usize = results.iter().map(|r| r.changes.len()).sum();
        output::print_summary(&mut writer, results.len(), changed, total)?;
        if !options.apply && total > 0 {
            writeln!(
                writer,
                "{}",
                "Dry-run: pass --apply to write the changes.".dimmed()
            )?;
        }
    }

    Ok(results)
}
