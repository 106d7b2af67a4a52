//! Stylesheet/script minification command.

use crate::engine::RewriteEngine;
use crate::output::{self, format_size_change};
use crate::rules::css::CssMinifyRule;
use crate::rules::js::JsMinifyRule;
use crate::utils::{collect_files, is_minified_artifact, minified_sibling, normalize_display_path};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Options for the minify command.
#[derive(Debug, Default)]
pub struct MinifyOptions {
    /// Print minified content instead of writing sibling files.
    pub stdout: bool,
    /// Output raw JSON.
    pub json: bool,
    /// Verbose diagnostics on stderr.
    pub verbose: bool,
    /// Show only the summary.
    pub quiet: bool,
    /// Folders to exclude from directory walks.
    pub exclude: Vec<String>,
}

/// Outcome of minifying one file.
#[derive(Debug, Serialize)]
pub struct MinifyResult {
    /// Source file.
    pub file: String,
    /// Output file, `None` in stdout mode.
    pub output: Option<String>,
    /// Size before, in bytes.
    pub before: usize,
    /// Size after, in bytes.
    pub after: usize,
}

/// Minify the stylesheets and scripts under the target paths.
///
/// Already-minified artifacts (`*.min.*`) are skipped so repeated runs do
/// not chew on their own output.
///
/// # Errors
///
/// Returns an error if writing to the output fails. Per-file read/write
/// problems are reported and skipped.
pub fn run_minify<W: Write>(
    paths: &[PathBuf],
    options: &MinifyOptions,
    mut writer: W,
) -> Result<Vec<MinifyResult>> {
    let files: Vec<PathBuf> = collect_files(paths, &["css", "js"], &options.exclude)
        .into_iter()
        .filter(|file| !is_minified_artifact(file))
        .collect();

    if options.verbose {
        eprintln!("[VERBOSE] {} files to minify", files.len());
    }

    if files.is_empty() {
        if !options.json {
            writeln!(writer, "No stylesheets or scripts found.")?;
        }
        return Ok(Vec::new());
    }

    let css_engine = RewriteEngine::new(vec![Box::new(CssMinifyRule)]);
    let js_engine = RewriteEngine::new(vec![Box::new(JsMinifyRule)]);
    let progress = output::create_progress_bar(files.len() as u64);

    let mut outcomes: Vec<(PathBuf, std::io::Result<(usize, String)>)> = files
        .par_iter()
        .map(|file| {
            let outcome = fs::read_to_string(file).map(|content| {
                let is_css = file
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("css"));
                let engine = if is_css { &css_engine } else { &js_engine };
                (content.len(), engine.run(&content).text)
            });
            progress.inc(1);
            (file.clone(), outcome)
        })
        .collect();
    progress.finish_and_clear();
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut results = Vec::new();
    for (file, outcome) in outcomes {
        let display = normalize_display_path(&file);
        let (before, minified) = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                writeln!(writer, "  {} {display}: {e}", "Skip:".yellow())?;
                continue;
            }
        };

        let after = minified.len();

        let output_path = if options.stdout {
            writeln!(writer, "{minified}")?;
            None
        } else {
            let sibling = minified_sibling(&file);
            if let Err(e) = fs::write(&sibling, &minified) {
                writeln!(writer, "  {} {display}: {e}", "Write failed:".red())?;
                continue;
            }
            Some(normalize_display_path(&sibling))
        };

        if !options.json && !options.quiet && !options.stdout {
            writeln!(
                writer,
                "{} {display}: {}",
                "Minified:".green().bold(),
                format_size_change(before, after)
            )?;
        }

        results.push(MinifyResult {
            file: display,
            output: output_path,
            before,
            after,
        });
    }

    if options.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&results)?)?;
    } else if !options.stdout {
        let saved: usize = results
            .iter()
            .map(|r| r.before.saturating_sub(r.after))
            .sum();
        writeln!(writer)?;
        writeln!(
            writer,
            "{} {} files, {saved} bytes saved",
            "Summary:".cyan().bold(),
            results.len()
        )?;
    }

    Ok(results)
}
