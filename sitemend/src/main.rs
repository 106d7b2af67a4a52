//! Main binary entry point for the sitemend toolkit.
//!
//! This binary simply delegates to the shared `entry_point::run_with_args()`
//! function to ensure consistent behavior across both binaries. The serve
//! command lives in `sitemend-cli`, which owns the async runtime.

use anyhow::Result;

fn main() -> Result<()> {
    let code = sitemend::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
