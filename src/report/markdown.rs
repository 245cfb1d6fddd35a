use std::fmt::Write;

use super::{format_time, join_or_na};
use crate::types::AnalysisResult;

/// Markdown report with tables for keywords and themes.
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let stats = &result.corpus_stats;

    let _ = writeln!(out, "# Idea Miner Report\n");

    let _ = writeln!(out, "## Key Metrics\n");
    let _ = writeln!(out, "- **Conversations:** {}", stats.conversation_count);
    let _ = writeln!(out, "- **Messages:** {}", stats.message_count);
    let _ = writeln!(out, "- **Tokens:** {}", stats.token_count);
    let _ = writeln!(out, "- **Participants:** {}", join_or_na(&stats.participants));
    let _ = writeln!(out, "- **First interaction:** {}", format_time(stats.first_interaction));
    let _ = writeln!(out, "- **Last interaction:** {}", format_time(stats.last_interaction));

    let _ = writeln!(out, "\n## Top Keywords\n");
    if result.top_keywords.is_empty() {
        let _ = writeln!(out, "_No keywords found._");
    } else {
        let _ = writeln!(out, "| Rank | Keyword | Count |");
        let _ = writeln!(out, "|---:|---|---:|");
        for (i, (word, count)) in result.top_keywords.iter().enumerate() {
            let _ = writeln!(out, "| {} | {} | {} |", i + 1, escape_cell(word), count);
        }
    }

    if !result.top_bigrams.is_empty() {
        let _ = writeln!(out, "\n## Top Bigrams\n");
        let _ = writeln!(out, "| Rank | Bigram | Count |");
        let _ = writeln!(out, "|---:|---|---:|");
        for (i, (bigram, count)) in result.top_bigrams.iter().enumerate() {
            let _ = writeln!(out, "| {} | {} | {} |", i + 1, escape_cell(bigram), count);
        }
    }

    let sentiment = &result.overall_sentiment;
    let dist = &result.sentiment_distribution;
    let _ = writeln!(out, "\n## Sentiment\n");
    let _ = writeln!(
        out,
        "- **Overall:** {} ({:.3})",
        sentiment.label, sentiment.score
    );
    let _ = writeln!(
        out,
        "- **Lexicon hits:** {} positive / {} negative",
        sentiment.positive_hits, sentiment.negative_hits
    );
    let _ = writeln!(
        out,
        "- **Messages:** {} positive / {} neutral / {} negative",
        dist.positive, dist.neutral, dist.negative
    );

    let _ = writeln!(out, "\n## Themes\n");
    if result.theme_scores.is_empty() {
        let _ = writeln!(out, "No recurring themes detected.");
    } else {
        let _ = writeln!(out, "| Theme | Score | Conversations | Matched keywords |");
        let _ = writeln!(out, "|---|---:|---:|---|");
        for theme in &result.theme_scores {
            let conversations = result
                .theme_coverage
                .iter()
                .find(|c| c.theme == theme.theme)
                .map(|c| c.conversation_count)
                .unwrap_or(0);
            let _ = writeln!(
                out,
                "| {} | {:.1} | {} | {} |",
                escape_cell(&theme.theme_name),
                theme.score,
                conversations,
                escape_cell(&join_or_na(&theme.matched_keywords))
            );
        }
    }

    if !result.theme_coverage.is_empty() || result.unmatched_conversations > 0 {
        let _ = writeln!(out, "\n### Coverage\n");
        for cov in &result.theme_coverage {
            let _ = writeln!(
                out,
                "- **{}:** {} (keywords: {})",
                cov.theme_name,
                join_or_na(&cov.example_titles),
                join_or_na(&cov.top_keywords)
            );
        }
        let _ = writeln!(
            out,
            "- **Other (no theme):** {} conversations",
            result.unmatched_conversations
        );
    }

    if !result.timeline.is_empty() {
        let _ = writeln!(out, "\n## Timeline\n");
        let _ = writeln!(out, "| Month | Conversations |");
        let _ = writeln!(out, "|---|---:|");
        for point in &result.timeline {
            let _ = writeln!(out, "| {} | {} |", point.month, point.conversations);
        }
    }

    let _ = writeln!(out, "\n## Strategic Opportunities\n");
    for opp in &result.opportunities {
        let _ = writeln!(out, "- **{}:** {}", opp.theme_name, opp.text);
    }
    let _ = writeln!(out, "- {}", result.sentiment_guidance);

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::Analyzer;
    use crate::types::{ConversationRecord, Message, Role};

    #[test]
    fn renders_tables_and_opportunities() {
        let corpus = vec![ConversationRecord::new(
            "1",
            "Automations",
            vec![
                Message::new(Role::User, "The n8n workflow webhook failed again"),
                Message::new(Role::Assistant, "Check the n8n workflow trigger logs"),
            ],
        )];
        let result = Analyzer::builtin().analyze(&corpus);
        let md = render_markdown(&result);

        assert!(md.starts_with("# Idea Miner Report"));
        assert!(md.contains("| Rank | Keyword | Count |"));
        assert!(md.contains("| 1 | n8n | 2 |"));
        assert!(md.contains("| Workflow Automation & n8n |"));
        assert!(md.contains("- **Workflow Automation & n8n:** Automations (keywords: "));
        assert!(md.contains("- **Other (no theme):** 0 conversations"));
        for opp in &result.opportunities {
            assert!(md.contains(&opp.text));
        }
        assert!(md.contains(&result.sentiment_guidance));
    }

    #[test]
    fn pipes_are_escaped() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }
}
