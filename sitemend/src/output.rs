//! Rich CLI output formatting: colored change logs, tables, progress.

use crate::engine::Change;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write, title: &str) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", format!("== {title} ==").cyan().bold())?;
    writeln!(writer)?;
    Ok(())
}

/// Print the change log of one document.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_changes(
    writer: &mut impl Write,
    display_path: &str,
    changes: &[Change],
) -> std::io::Result<()> {
    if changes.is_empty() {
        writeln!(writer, "{} {}", "No changes:".dimmed(), display_path)?;
        return Ok(());
    }

    writeln!(
        writer,
        "{} {} ({} changes)",
        "Changed:".green().bold(),
        display_path,
        changes.len()
    )?;
    for change in changes {
        writeln!(
            writer,
            "  {} {}",
            format!("[{}]", change.rule).yellow(),
            change.description
        )?;
    }
    Ok(())
}

/// Print the batch summary line.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    processed: usize,
    changed: usize,
    total_changes: usize,
) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{} {processed} files processed, {changed} changed, {total_changes} changes",
        "Summary:".cyan().bold()
    )?;
    Ok(())
}

/// Build the per-file CSP hash table.
#[must_use]
pub fn csp_table(rows: &[(String, usize, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Script", "sha256"]);
    for (file, index, hash) in rows {
        table.add_row(vec![
            Cell::new(file),
            Cell::new(index.to_string()),
            Cell::new(hash),
        ]);
    }
    table
}

/// Human-readable byte size with the reduction percentage.
#[must_use]
pub fn format_size_change(before: usize, after: usize) -> String {
    let saved = before.saturating_sub(after);
    let percent = if before == 0 {
        0.0
    } else {
        (saved as f64 / before as f64) * 100.0
    };
    format!("{before} -> {after} bytes (saved {saved}, {percent:.1}%)")
}

/// Create a progress bar for a batch of files.
///
/// In test mode, returns a hidden progress bar to avoid polluting test
/// output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("processing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}
