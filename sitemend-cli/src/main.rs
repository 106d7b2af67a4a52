//! Command-line interface entry point for sitemend.
//!
//! The serve command needs the tokio runtime and is handled here; every
//! other command delegates to the shared entry point in the library.

mod server;

use anyhow::Result;
use clap::Parser;
use sitemend::cli::{Cli, Commands};
use sitemend::config::Config;
use sitemend::constants::DEFAULT_SERVER_CSP;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().is_some_and(|arg| arg == "serve") {
        let cli = Cli::parse();
        if let Commands::Serve { root, port } = cli.command {
            return run_serve(root, port);
        }
    }

    // Delegate CLI args to shared entry_point function
    let code = sitemend::entry_point::run_with_args(args)?;
    std::process::exit(code);
}

fn run_serve(root: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let base = root.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_from_path(&base);
    let server_config = &config.sitemend.server;

    let options = server::ServeOptions {
        root: root
            .or_else(|| server_config.root.clone())
            .unwrap_or_else(|| PathBuf::from(".")),
        port: port.unwrap_or(server_config.port),
        csp: server_config
            .csp
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_CSP.to_owned()),
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::run(options))
}
