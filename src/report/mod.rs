pub mod json;
pub mod markdown;
pub mod text;

pub use json::render_json;
pub use markdown::render_markdown;
pub use text::render_text;

use chrono::{DateTime, Utc};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportFormat {
    Text,
    Markdown,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [
        ReportFormat::Json,
        ReportFormat::Markdown,
        ReportFormat::Text,
    ];

    /// File name used when writing every format into a directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Text => "analysis_report.txt",
            ReportFormat::Markdown => "analysis_report.md",
            ReportFormat::Json => "analysis_report.json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!(
                "invalid format '{}': expected text, markdown, or json",
                s
            )),
        }
    }
}

pub fn render(
    result: &crate::types::AnalysisResult,
    format: ReportFormat,
) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(result)),
        ReportFormat::Markdown => Ok(render_markdown(result)),
        ReportFormat::Json => render_json(result, Utc::now()),
    }
}

fn format_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn join_or_na<S: AsRef<str>>(items: impl IntoIterator<Item = S>) -> String {
    let joined = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "N/A".to_string()
    } else {
        joined
    }
}
