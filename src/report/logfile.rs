//! Search log file
//!
//! One timestamped line per match, followed by a block with the search
//! parameters and final statistics.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::model::{MatchEvent, MatchKind, SearchOutcome, SearchRequest};
use crate::core::render::statistics_lines;
use crate::engine::collector::MatchSink;

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "search_results.log";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    writer: BufWriter<File>,
    write_failed: bool,
}

impl LogFile {
    /// Create (or truncate) the log file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            write_failed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the summary block and flush
    pub fn write_summary(
        &mut self,
        request: &SearchRequest,
        outcome: &SearchOutcome,
    ) -> Result<()> {
        let mut block = vec![
            String::new(),
            format!("{} Search Summary", timestamp()),
            format!("Root: {}", request.root.display()),
        ];
        if let Some(name) = &request.file_name {
            block.push(format!("File name: {}", name));
        }
        if let Some(name) = &request.dir_name {
            block.push(format!("Directory name: {}", name));
        }
        if let Some(pattern) = &request.pattern {
            block.push(format!("Regex pattern: {}", pattern));
        }
        block.push(format!("Return early: {}", request.return_early));
        block.push(format!("Workers: {}", request.max_workers));
        block.push(format!("Duration: {:?}", outcome.elapsed));
        if request.file_name.is_some() {
            block.push(format!("File found: {}", outcome.file_found));
        }
        if request.dir_name.is_some() {
            block.push(format!("Directory found: {}", outcome.dir_found));
        }
        block.extend(statistics_lines(request, outcome));
        block.push(format!("- Directories scanned: {}", outcome.metrics.dirs_listed));
        block.push(format!(
            "- Unreadable directories: {}",
            outcome.metrics.errors
        ));

        self.write_lines(&block)
            .with_context(|| format!("Failed to write log file: {}", self.path.display()))
    }

    fn write_lines(&mut self, lines: &[String]) -> std::io::Result<()> {
        for line in lines {
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()
    }
}

impl MatchSink for LogFile {
    fn on_match(&mut self, event: &MatchEvent) {
        if self.write_failed {
            return;
        }
        let label = match event.kind {
            MatchKind::File => "File",
            MatchKind::Dir => "Directory",
            MatchKind::Regex => "Regex match",
        };
        if let Err(err) = writeln!(
            self.writer,
            "{} {} found: {}",
            timestamp(),
            label,
            event.path.display()
        ) {
            warn!("Failed to write log file {}: {}", self.path.display(), err);
            self.write_failed = true;
        }
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
