use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.sitemend.toml):
  Create this file in your site root to set defaults.

  [sitemend]
  exclude_folders = [\"dist\", \"node_modules\"]

  [sitemend.images]
  default_width = 300         # Fallback size for unknown images
  default_height = 200

  [[sitemend.images.sizes]]   # Extra dimension table entries
  match = \"hero-banner\"
  width = 1200
  height = 400

  [sitemend.csp]
  extra_script_src = [\"https://cdn.example\"]

  [sitemend.server]
  port = 8000
  csp = \"default-src 'self'\"
";

/// Shared path arguments.
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Paths to process (files or directories).
    /// When no paths are provided, defaults to the current directory.
    pub paths: Vec<PathBuf>,
}

impl PathArgs {
    /// The target paths, defaulting to the current directory.
    #[must_use]
    pub fn resolved(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (shows files being processed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary line.
    #[arg(long)]
    pub quiet: bool,
}

/// Rule selection flags for the fix command.
#[derive(Args, Debug, Default, Clone)]
pub struct RuleFlags {
    /// Add missing width/height attributes to images.
    #[arg(long)]
    pub dimensions: bool,

    /// Insert critical font preload links into <head>.
    #[arg(long = "font-preload")]
    pub font_preload: bool,

    /// Insert the layout stability style block before </head>.
    #[arg(long)]
    pub stability: bool,

    /// Remove Inter font preload links and collapse leftover blank lines.
    #[arg(long = "strip-preloads")]
    pub strip_preloads: bool,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sitemend - rule-based maintenance toolkit for static sites",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    /// The subcommand to execute.
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
/// Available subcommands.
pub enum Commands {
    /// Apply the HTML fix-up rules (layout shift, preloads)
    Fix {
        /// Target paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Rule selection; with no flag the layout-shift set runs
        /// (dimensions, font preload, stability).
        #[command(flatten)]
        rules: RuleFlags,

        /// Write the rewritten files back to disk.
        /// Without this flag only the change log is shown (dry-run).
        #[arg(short = 'a', long)]
        apply: bool,

        /// Folders to exclude from directory walks.
        #[arg(long, alias = "exclude-folder")]
        exclude: Vec<String>,

        /// Output options.
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Minify stylesheets and scripts to .min siblings
    Minify {
        /// Target paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Print minified content to stdout instead of writing files.
        #[arg(long)]
        stdout: bool,

        /// Folders to exclude from directory walks.
        #[arg(long, alias = "exclude-folder")]
        exclude: Vec<String>,

        /// Output options.
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Calculate CSP hashes for inline scripts
    Csp {
        /// Target paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Folders to exclude from directory walks.
        #[arg(long, alias = "exclude-folder")]
        exclude: Vec<String>,

        /// Output options.
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Audit preload declarations for unused targets
    Check {
        /// Target paths.
        #[command(flatten)]
        paths: PathArgs,

        /// Exit with code 1 when issues are found.
        #[arg(long)]
        strict: bool,

        /// Folders to exclude from directory walks.
        #[arg(long, alias = "exclude-folder")]
        exclude: Vec<String>,

        /// Output options.
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Serve the site locally with security headers
    Serve {
        /// Directory to serve (defaults to config value or current dir).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Port to bind (defaults to config value or 8000).
        #[arg(short, long)]
        port: Option<u16>,
    },
}
