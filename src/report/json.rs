use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::types::AnalysisResult;

const GENERATOR: &str = concat!("idea-miner ", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    analyzed_at: String,
    generator: &'static str,
    analysis: &'a AnalysisResult,
}

/// Pretty JSON envelope around the full result.
pub fn render_json(result: &AnalysisResult, analyzed_at: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        analyzed_at: analyzed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        generator: GENERATOR,
        analysis: result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::Analyzer;
    use crate::types::{ConversationRecord, Message, Role};
    use chrono::TimeZone;

    #[test]
    fn envelope_and_camel_case_fields() {
        let corpus = vec![ConversationRecord::new(
            "c1",
            "Sheets",
            vec![Message::new(Role::User, "google sheets dashboard export")],
        )];
        let result = Analyzer::builtin().analyze(&corpus);
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let rendered = render_json(&result, at).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["analyzedAt"], "2024-06-01T12:00:00Z");
        assert!(json["generator"].as_str().unwrap().starts_with("idea-miner"));
        let analysis = &json["analysis"];
        assert_eq!(analysis["corpusStats"]["conversationCount"], 1);
        assert_eq!(analysis["themeScores"][0]["theme"], "data-reporting");
        assert_eq!(analysis["topKeywords"][0][0], "google");
        assert_eq!(analysis["overallSentiment"]["label"], "neutral");
        assert!(analysis["opportunities"].is_array());
    }
}
