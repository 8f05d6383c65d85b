//! cli
//!
//! Command-line interface layer for dirpush.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and set up logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, resolves settings
//! (defaults < config file < flags), and hands off to [`crate::engine`].

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::core::config::Config;
use crate::engine;
use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug, cli.quiet);

    let loaded = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
        config: loaded.config,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Default log filter when `RUST_LOG` is not set.
fn default_filter(debug: bool, quiet: bool) -> &'static str {
    if debug {
        "dirpush=debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

fn init_tracing(debug: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug, quiet)));
    // try_init: a subscriber may already be installed when run in-process
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_wins_over_quiet() {
        assert_eq!(default_filter(true, true), "dirpush=debug");
        assert_eq!(default_filter(false, true), "warn");
        assert_eq!(default_filter(false, false), "info");
    }
}
