use std::fmt::Write;

use super::{format_time, join_or_na};
use crate::types::AnalysisResult;

/// Plain-text summary for terminals.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let stats = &result.corpus_stats;

    // writeln! into a String cannot fail
    let _ = writeln!(out, "=== Idea Miner Summary ===\n");
    let _ = writeln!(out, "Key Metrics:");
    let _ = writeln!(out, "  Conversations: {}", stats.conversation_count);
    let _ = writeln!(out, "  Messages: {}", stats.message_count);
    let _ = writeln!(out, "  Tokens: {}", stats.token_count);
    let _ = writeln!(out, "  Participants: {}", join_or_na(&stats.participants));
    let _ = writeln!(out, "  First Interaction: {}", format_time(stats.first_interaction));
    let _ = writeln!(out, "  Last Interaction: {}", format_time(stats.last_interaction));

    let _ = writeln!(out, "\nTop Keywords:");
    if result.top_keywords.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (i, (word, count)) in result.top_keywords.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}: {}", i + 1, word, count);
    }

    if !result.top_bigrams.is_empty() {
        let _ = writeln!(out, "\nTop Bigrams:");
        for (i, (bigram, count)) in result.top_bigrams.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}: {}", i + 1, bigram, count);
        }
    }

    let sentiment = &result.overall_sentiment;
    let dist = &result.sentiment_distribution;
    let _ = writeln!(out, "\nSentiment:");
    let _ = writeln!(out, "  Overall: {} ({:.3})", sentiment.label, sentiment.score);
    let _ = writeln!(
        out,
        "  Messages: {} positive / {} neutral / {} negative",
        dist.positive, dist.neutral, dist.negative
    );

    let _ = writeln!(out, "\nThemes:");
    if result.theme_scores.is_empty() {
        let _ = writeln!(out, "  No recurring themes detected.");
    }
    for theme in &result.theme_scores {
        let _ = writeln!(
            out,
            "  {}: {:.1} ({})",
            theme.theme_name,
            theme.score,
            join_or_na(&theme.matched_keywords)
        );
    }

    if !result.theme_coverage.is_empty() || result.unmatched_conversations > 0 {
        let _ = writeln!(out, "\nTheme Coverage:");
        for cov in &result.theme_coverage {
            let _ = writeln!(
                out,
                "  {}: {} conversations (e.g. {})",
                cov.theme_name,
                cov.conversation_count,
                join_or_na(&cov.example_titles)
            );
            let _ = writeln!(out, "    keywords: {}", join_or_na(&cov.top_keywords));
        }
        let _ = writeln!(
            out,
            "  Other (no theme): {} conversations",
            result.unmatched_conversations
        );
    }

    if !result.timeline.is_empty() {
        let _ = writeln!(out, "\nTimeline (conversations per month):");
        for point in &result.timeline {
            let _ = writeln!(out, "  {}: {}", point.month, point.conversations);
        }
    }

    let _ = writeln!(out, "\nStrategic Opportunities:");
    for opp in &result.opportunities {
        let _ = writeln!(out, "  - [{}] {}", opp.theme_name, opp.text);
    }
    let _ = writeln!(out, "  - {}", result.sentiment_guidance);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::Analyzer;
    use crate::types::{ConversationRecord, Message, Role};

    #[test]
    fn renders_every_section() {
        let corpus = vec![ConversationRecord::new(
            "1",
            "POS rollout",
            vec![Message::new(Role::User, "Toast POS menu sync is broken again")],
        )];
        let result = Analyzer::builtin().analyze(&corpus);
        let text = render_text(&result);

        assert!(text.starts_with("=== Idea Miner Summary ==="));
        assert!(text.contains("  Conversations: 1"));
        assert!(text.contains("Top Bigrams:"));
        assert!(text.contains("toast pos: 1"));
        assert!(text.contains("Overall: negative"));
        assert!(text.contains("Restaurant Operations & Toast POS"));
        assert!(text.contains("POS rollout"));
        assert!(text.contains("    keywords: toast, pos, menu, toast pos"));
        assert!(text.contains("  Other (no theme): 0 conversations"));
        assert!(text.contains(&result.sentiment_guidance));
    }

    #[test]
    fn empty_result_still_renders() {
        let text = render_text(&Analyzer::builtin().analyze(&[]));
        assert!(text.contains("  Conversations: 0"));
        assert!(text.contains("  (none)"));
        assert!(text.contains("No recurring themes detected."));
        assert!(text.contains("First Interaction: Unknown"));
    }
}
