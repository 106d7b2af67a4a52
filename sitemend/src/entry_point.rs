//! Shared CLI entry point.
//!
//! Both binaries funnel through [`run_with_args`] so behavior stays
//! identical regardless of which one was invoked; the only command
//! handled elsewhere is `serve`, which needs the async runtime that lives
//! in the `sitemend-cli` crate.

use crate::cli::{Cli, Commands};
use crate::commands::{CheckOptions, CspOptions, FixOptions, MinifyOptions};
use crate::config::Config;
use anyhow::Result;
use clap::Parser;

/// Runs the selected command with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run sitemend with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["sitemend".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    match cli.command {
        Commands::Fix {
            paths,
            rules,
            apply,
            mut exclude,
            output,
        } => {
            let targets = paths.resolved();
            let config = load_config(&targets);
            merge_excludes(&mut exclude, &config);
            let options = FixOptions {
                apply,
                dimensions: rules.dimensions,
                font_preload: rules.font_preload,
                stability: rules.stability,
                strip_preloads: rules.strip_preloads,
                json: output.json,
                verbose: output.verbose,
                quiet: output.quiet,
                exclude,
            };
            crate::commands::run_fix(&targets, &options, &config, writer)?;
            Ok(0)
        }
        Commands::Minify {
            paths,
            stdout,
            mut exclude,
            output,
        } => {
            let targets = paths.resolved();
            let config = load_config(&targets);
            merge_excludes(&mut exclude, &config);
            let options = MinifyOptions {
                stdout,
                json: output.json,
                verbose: output.verbose,
                quiet: output.quiet,
                exclude,
            };
            crate::commands::run_minify(&targets, &options, writer)?;
            Ok(0)
        }
        Commands::Csp {
            paths,
            mut exclude,
            output,
        } => {
            let targets = paths.resolved();
            let config = load_config(&targets);
            merge_excludes(&mut exclude, &config);
            let options = CspOptions {
                json: output.json,
                verbose: output.verbose,
                quiet: output.quiet,
                exclude,
            };
            crate::commands::run_csp(&targets, &options, &config, writer)?;
            Ok(0)
        }
        Commands::Check {
            paths,
            strict,
            mut exclude,
            output,
        } => {
            let targets = paths.resolved();
            let config = load_config(&targets);
            merge_excludes(&mut exclude, &config);
            let options = CheckOptions {
                json: output.json,
                verbose: output.verbose,
                quiet: output.quiet,
                exclude,
            };
            let issues = crate::commands::run_check(&targets, &options, writer)?;
            if strict && issues > 0 {
                return Ok(1);
            }
            Ok(0)
        }
        Commands::Serve { .. } => {
            // The serve command needs the tokio runtime and is handled in
            // sitemend-cli before calling the entry point.
            eprintln!("Error: the serve command is only available through the sitemend-cli binary.");
            Ok(1)
        }
    }
}

fn load_config(targets: &[std::path::PathBuf]) -> Config {
    let base = targets
        .first()
        .map_or(std::path::Path::new("."), std::path::PathBuf::as_path);
    Config::load_from_path(base)
}

fn merge_excludes(exclude: &mut Vec<String>, config: &Config) {
    if let Some(configured) = &config.sitemend.exclude_folders {
        exclude.extend(configured.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_exits_zero() {
        let mut buffer = Vec::new();
        let code = run_with_args_to(vec!["--help".to_owned()], &mut buffer).unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(buffer).unwrap().contains("sitemend"));
    }

    #[test]
    fn unknown_flag_exits_one() {
        let mut buffer = Vec::new();
        let code = run_with_args_to(
            vec!["fix".to_owned(), "--no-such-flag".to_owned()],
            &mut buffer,
        )
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn serve_is_rejected_by_library_entry_point() {
        let mut buffer = Vec::new();
        let code = run_with_args_to(vec!["serve".to_owned()], &mut buffer).unwrap();
        assert_eq!(code, 1);
    }
}
