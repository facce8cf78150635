//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;

use crate::core::model::{SearchRequest, DEFAULT_WORKERS};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::engine::search::Searcher;
use crate::report::console::ConsoleSink;
use crate::report::logfile::{LogFile, DEFAULT_LOG_FILE};

/// dirseek - find files and directories by name or regex, concurrently.
#[derive(Parser, Debug)]
#[command(name = "dirseek")]
#[command(
    author,
    version,
    about,
    long_about = r#"dirseek walks a directory tree on several threads and reports every entry
whose name equals --file (files only), equals --dir (directories only), or
matches --regex (files and directories).

Matches are printed as they are found, followed by the elapsed time and a
statistics block. A target that is not found is reported, but is not an error.

Examples:
    dirseek --file Cargo.toml
    dirseek --dir node_modules --root ~/src -r
    dirseek --regex '\.rs$' --workers 32 --log
    dirseek --file README.md --format jsonl
"#
)]
pub struct Cli {
    /// Exact file name to search for.
    #[arg(
        long,
        value_name = "NAME",
        long_help = "Exact file name to search for.\n\n\
Only non-directory entries are compared. The comparison is case-sensitive and\n\
uses the entry name only, not its path."
    )]
    pub file: Option<String>,

    /// Exact directory name to search for.
    #[arg(
        long,
        value_name = "NAME",
        long_help = "Exact directory name to search for.\n\n\
Only directory entries are compared. Symlinks to directories are not\n\
directories for this purpose and are never followed."
    )]
    pub dir: Option<String>,

    /// Regex matched against every entry name.
    #[arg(
        long,
        value_name = "PATTERN",
        long_help = "Regular expression matched against every entry name (files and\n\
directories). The match is a search, not a full match: use ^ and $ to anchor.\n\n\
An invalid pattern is rejected before anything is read."
    )]
    pub regex: Option<String>,

    /// Root directory to start the search from.
    #[arg(
        long,
        default_value = ".",
        env = "DIRSEEK_ROOT",
        value_name = "ROOT",
        long_help = "Root directory to start the search from (defaults to the current\n\
directory).\n\n\
The search fails immediately if this path does not exist."
    )]
    pub root: PathBuf,

    /// Stop as soon as the requested targets have been found.
    #[arg(
        short = 'r',
        long = "return-early",
        long_help = "Stop as soon as the requested targets have been found.\n\n\
With --file and --dir, the walk stops once both have been seen. With only one\n\
of them, once that one has been seen. With only --regex, at the first match.\n\
Counts reported after an early stop are lower bounds."
    )]
    pub return_early: bool,

    /// Maximum number of concurrent walk threads.
    #[arg(
        long,
        default_value_t = DEFAULT_WORKERS as u32,
        env = "DIRSEEK_WORKERS",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..),
        long_help = "Maximum number of subdirectories walked concurrently on extra threads.\n\n\
When all workers are busy, subdirectories are walked inline by the thread that\n\
found them, so the search never waits for a free worker."
    )]
    pub workers: u32,

    /// Write matches and statistics to a log file.
    #[arg(
        long,
        long_help = "Write a timestamped line per match and a final statistics block to\n\
the file given by --logfile. The file is truncated at start."
    )]
    pub log: bool,

    /// Log file path (used with --log).
    #[arg(
        long,
        default_value = DEFAULT_LOG_FILE,
        env = "DIRSEEK_LOGFILE",
        value_name = "PATH"
    )]
    pub logfile: PathBuf,

    /// Do not report directories that cannot be read.
    #[arg(
        long,
        long_help = "Silently skip directories that cannot be read (permissions, races with\n\
deletion, I/O errors). They are skipped either way; this only hides the warnings."
    )]
    pub noerrors: bool,

    /// Output format (text/jsonl/json).
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "jsonl", "json"],
        value_name = "FORMAT",
        long_help = "Select the console output format.\n\n\
Supported values:\n\
- text (default): one line per match, then a statistics block\n\
- jsonl: one JSON object per match, then one summary object\n\
- json: a single JSON document printed when the search ends"
    )]
    pub format: String,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (walk diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the search request described by the flags
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(self.root.clone())
            .file_name(self.file.clone().unwrap_or_default())
            .dir_name(self.dir.clone().unwrap_or_default())
            .pattern(self.regex.clone().unwrap_or_default())
            .return_early(self.return_early)
            .max_workers(self.workers as usize)
            .suppress_errors(self.noerrors)
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let request = cli.to_request();
    if !request.has_target() {
        println!("Please provide at least one search target (--file, --dir, or --regex)");
        return Ok(());
    }

    if !request.root.exists() {
        bail!(
            "Specified root directory '{}' does not exist",
            request.root.display()
        );
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let color = !cli.no_color && io::stdout().is_terminal();
    let renderer = Renderer::with_config(RenderConfig::new(format, color));
    let console = ConsoleSink::new(renderer, io::stdout().lock());

    // the log file is truncated on create, so reject a bad pattern first
    let searcher = Searcher::new(&request);
    searcher.validate().context("Error during search")?;

    let log = if cli.log {
        Some(LogFile::create(&cli.logfile)?)
    } else {
        None
    };

    let mut sink = (console, log);
    let outcome = searcher.run(&mut sink).context("Error during search")?;

    let (mut console, log) = sink;
    console
        .finish(&request, &outcome)
        .context("Failed to write results")?;

    if let Some(mut log) = log {
        log.write_summary(&request, &outcome)?;
        info!("Results written to {}", log.path().display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dirseek", "--file", "a.txt"]).unwrap();
        let request = cli.to_request();

        assert_eq!(request.root, PathBuf::from("."));
        assert_eq!(request.file_name.as_deref(), Some("a.txt"));
        assert_eq!(request.max_workers, DEFAULT_WORKERS);
        assert!(!request.return_early);
        assert!(!request.suppress_errors);
        assert_eq!(cli.logfile, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_flags_map_to_request() {
        let cli = Cli::try_parse_from([
            "dirseek",
            "--dir",
            "src",
            "--regex",
            "^main",
            "--root",
            "/tmp",
            "-r",
            "--workers",
            "3",
            "--noerrors",
        ])
        .unwrap();
        let request = cli.to_request();

        assert_eq!(request.dir_name.as_deref(), Some("src"));
        assert_eq!(request.pattern.as_deref(), Some("^main"));
        assert_eq!(request.root, PathBuf::from("/tmp"));
        assert!(request.return_early);
        assert_eq!(request.max_workers, 3);
        assert!(request.suppress_errors);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Cli::try_parse_from(["dirseek", "--file", "a", "--workers", "0"]).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["dirseek", "--file", "a", "--format", "xml"]).is_err());
    }
}
