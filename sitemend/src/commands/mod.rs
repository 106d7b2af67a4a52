//! Commands module - CLI subcommand implementations.
//!
//! This module contains the implementations for all CLI subcommands,
//! organized by maintenance task.

mod check;
mod csp;
mod fix;
mod minify;

// Re-export all public items
pub use check::{run_check, CheckOptions};
pub use csp::{run_csp, CspOptions};
pub use fix::{run_fix, FileFixResult, FixOptions};
pub use minify::{run_minify, MinifyOptions, MinifyResult};
