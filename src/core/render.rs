//! Renderer module
//!
//! Renders match events and the final summary to text, jsonl or json

use colored::Colorize;
use serde_json::{json, Value};

use crate::core::model::{MatchEvent, MatchKind, SearchOutcome, SearchRequest};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }
}

/// Renderer for matches and summaries
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    /// Render a single match as it arrives.
    ///
    /// Returns `None` for formats that only print once the search is over.
    pub fn render_match(&self, event: &MatchEvent) -> Option<String> {
        match self.config.format {
            OutputFormat::Text => Some(self.render_match_text(event)),
            OutputFormat::Jsonl => serde_json::to_string(&match_value(event)).ok(),
            OutputFormat::Json => None,
        }
    }

    /// Render the end-of-search report.
    ///
    /// `matches` is only consulted for the json format, which prints everything
    /// as one document.
    pub fn render_summary(
        &self,
        request: &SearchRequest,
        outcome: &SearchOutcome,
        matches: &[MatchEvent],
    ) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_summary_text(request, outcome),
            OutputFormat::Jsonl => serde_json::to_string(&summary_value(request, outcome))
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Json => {
                let document = json!({
                    "matches": matches.iter().map(match_value).collect::<Vec<_>>(),
                    "summary": summary_value(request, outcome),
                });
                serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
            }
        }
    }

    fn render_match_text(&self, event: &MatchEvent) -> String {
        let label = match_label(event.kind);
        let path = event.path.display().to_string();
        if self.config.color {
            let label = match event.kind {
                MatchKind::File => label.green(),
                MatchKind::Dir => label.blue(),
                MatchKind::Regex => label.yellow(),
            };
            format!("{} {}", label, path.bold())
        } else {
            format!("{} {}", label, path)
        }
    }

    fn render_summary_text(&self, request: &SearchRequest, outcome: &SearchOutcome) -> String {
        let mut lines = Vec::new();

        lines.push(String::new());
        lines.push(format!("Search completed in {:?}", outcome.elapsed));

        let mut missing = Vec::new();
        if request.file_name.is_some() && !outcome.file_found {
            missing.push("File not found");
        }
        if request.dir_name.is_some() && !outcome.dir_found {
            missing.push("Directory not found");
        }
        for message in missing {
            if self.config.color {
                lines.push(message.red().to_string());
            } else {
                lines.push(message.to_string());
            }
        }

        lines.push(String::new());
        lines.push("Search Statistics:".to_string());
        lines.extend(statistics_lines(request, outcome));

        lines.join("\n")
    }
}

/// Console/log label for a match kind
pub fn match_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::File => "File found at path:",
        MatchKind::Dir => "Directory found at path:",
        MatchKind::Regex => "Match found at path:",
    }
}

/// The `- Name: value` lines for every requested counter
pub fn statistics_lines(request: &SearchRequest, outcome: &SearchOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    if request.pattern.is_some() {
        lines.push(format!(
            "- Regex matches found: {}",
            outcome.stats.regex_matches
        ));
    }
    if request.file_name.is_some() {
        lines.push(format!("- Files found: {}", outcome.stats.files_found));
    }
    if request.dir_name.is_some() {
        lines.push(format!("- Directories found: {}", outcome.stats.dirs_found));
    }
    lines
}

fn match_value(event: &MatchEvent) -> Value {
    let mut value = serde_json::to_value(event).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("type".to_string(), Value::from("match"));
    }
    value
}

fn summary_value(request: &SearchRequest, outcome: &SearchOutcome) -> Value {
    let mut value = serde_json::to_value(outcome).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("type".to_string(), Value::from("summary"));
        map.insert(
            "request".to_string(),
            serde_json::to_value(request).unwrap_or(Value::Null),
        );
    }
    value
}
