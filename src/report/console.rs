//! Console output
//!
//! Prints matches as the collector accepts them, then the summary.

use std::io::{self, Write};

use crate::core::model::{MatchEvent, SearchOutcome, SearchRequest};
use crate::core::render::{OutputFormat, Renderer};
use crate::engine::collector::MatchSink;

pub struct ConsoleSink<W: Write> {
    renderer: Renderer,
    out: W,
    // only kept for the json format, which prints one document at the end
    deferred: Vec<MatchEvent>,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(renderer: Renderer, out: W) -> Self {
        Self {
            renderer,
            out,
            deferred: Vec::new(),
        }
    }

    /// Print the end-of-search report
    pub fn finish(&mut self, request: &SearchRequest, outcome: &SearchOutcome) -> io::Result<()> {
        let summary = self
            .renderer
            .render_summary(request, outcome, &self.deferred);
        writeln!(self.out, "{}", summary)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MatchSink for ConsoleSink<W> {
    fn on_match(&mut self, event: &MatchEvent) {
        if self.renderer.format() == OutputFormat::Json {
            self.deferred.push(event.clone());
        } else if let Some(line) = self.renderer.render_match(event) {
            // a closed stdout must not abort the walk
            let _ = writeln!(self.out, "{}", line);
        }
    }
}
