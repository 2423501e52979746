//! Binary entry point for `githerd`.
//!
//! A thin wrapper: initialize logging, parse the command line, hand over
//! to [`githerd::cli::Cli::execute`]. All the actual behavior lives in the
//! library crate.

use anyhow::Result;
use clap::Parser;

use githerd::cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    Cli::parse().execute()
}
