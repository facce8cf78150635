//! Result collector
//!
//! The only reader of the result stream. It owns the found-flags and the
//! statistics, so every update and the stop-condition check that follows it
//! happen as one step on one thread.

use crossbeam_channel::Receiver;
use tracing::info;

use crate::core::model::{MatchEvent, MatchKind, SearchRequest, SearchStats};
use crate::engine::cancel::CancellationSignal;

/// Consumer of accepted match events (console, log file, tests)
pub trait MatchSink {
    fn on_match(&mut self, event: &MatchEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MatchSink for NullSink {
    fn on_match(&mut self, _event: &MatchEvent) {}
}

impl MatchSink for Vec<MatchEvent> {
    fn on_match(&mut self, event: &MatchEvent) {
        self.push(event.clone());
    }
}

impl<S: MatchSink> MatchSink for Option<S> {
    fn on_match(&mut self, event: &MatchEvent) {
        if let Some(sink) = self {
            sink.on_match(event);
        }
    }
}

impl<A: MatchSink, B: MatchSink> MatchSink for (A, B) {
    fn on_match(&mut self, event: &MatchEvent) {
        self.0.on_match(event);
        self.1.on_match(event);
    }
}

/// When an early-return search may stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// Walk the whole tree
    Never,
    /// Both a file and a directory have been found
    FileAndDir,
    File,
    Dir,
    /// No named target: the first match of any kind
    FirstMatch,
}

impl StopRule {
    pub fn for_request(request: &SearchRequest) -> Self {
        if !request.return_early {
            return StopRule::Never;
        }
        match (request.file_name.is_some(), request.dir_name.is_some()) {
            (true, true) => StopRule::FileAndDir,
            (true, false) => StopRule::File,
            (false, true) => StopRule::Dir,
            (false, false) => StopRule::FirstMatch,
        }
    }
}

pub struct Collector<'a> {
    rule: StopRule,
    cancel: &'a CancellationSignal,
    file_found: bool,
    dir_found: bool,
    stats: SearchStats,
}

impl<'a> Collector<'a> {
    pub fn new(rule: StopRule, cancel: &'a CancellationSignal) -> Self {
        Self {
            rule,
            cancel,
            file_found: false,
            dir_found: false,
            stats: SearchStats::default(),
        }
    }

    /// Read events until every sender is gone
    pub fn drain(&mut self, events: &Receiver<MatchEvent>, sink: &mut dyn MatchSink) {
        for event in events.iter() {
            self.record(&event);
            sink.on_match(&event);
        }
    }

    /// Account for one event and cancel the walk if it satisfies the stop rule.
    ///
    /// Returns `true` when this event is the one that fired cancellation.
    pub fn record(&mut self, event: &MatchEvent) -> bool {
        match event.kind {
            MatchKind::File => {
                self.file_found = true;
                self.stats.files_found += 1;
            }
            MatchKind::Dir => {
                self.dir_found = true;
                self.stats.dirs_found += 1;
            }
            MatchKind::Regex => {
                self.stats.regex_matches += 1;
                if event.is_dir {
                    self.dir_found = true;
                } else {
                    self.file_found = true;
                }
            }
        }

        if self.should_stop() && self.cancel.cancel() {
            info!(path = %event.path.display(), "stop condition met, cancelling walk");
            return true;
        }
        false
    }

    fn should_stop(&self) -> bool {
        match self.rule {
            StopRule::Never => false,
            StopRule::FileAndDir => self.file_found && self.dir_found,
            StopRule::File => self.file_found,
            StopRule::Dir => self.dir_found,
            StopRule::FirstMatch => true,
        }
    }

    pub fn file_found(&self) -> bool {
        self.file_found
    }

    pub fn dir_found(&self) -> bool {
        self.dir_found
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}
