//! dirseek - Concurrent directory-tree search
//!
//! Entry point for the CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dirseek::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    setup_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("dirseek=debug,warn")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
