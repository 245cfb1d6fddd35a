use std::collections::BTreeSet;

use crate::analyzers::frequency::{count_bigrams, TermCounts};
use crate::analyzers::opportunity::{sentiment_guidance, OpportunityCatalog, SentimentKey};
use crate::analyzers::sentiment::{Lexicon, SentimentScorer, SentimentThresholds};
use crate::analyzers::stopwords::StopwordSet;
use crate::analyzers::themes::{ThemeCatalog, Trigger};
use crate::analyzers::timeline::{build_timeline, interaction_span};
use crate::config::AnalysisConfig;
use crate::error::ConfigError;
use crate::tokenizer::Tokenizer;
use crate::types::{
    AnalysisResult, ConversationRecord, ConversationSentiment, CorpusStats,
    SentimentDistribution, SentimentResult, ThemeCoverage, ThemeId,
};

/// Example titles and keywords kept per theme
const MAX_COVERAGE_ITEMS: usize = 5;

/// Runs every analysis stage over a corpus.
///
/// Built once from a validated config; `analyze` is pure and can be called
/// repeatedly with identical results for identical input.
#[derive(Debug, Clone)]
pub struct Analyzer {
    tokenizer: Tokenizer,
    scorer: SentimentScorer,
    themes: ThemeCatalog,
    opportunities: OpportunityCatalog,
    top_n_keywords: usize,
    top_n_bigrams: usize,
    top_k_themes: usize,
}

/// Per-conversation intermediate counts.
struct ConversationCounts {
    keywords: TermCounts,
    bigrams: TermCounts,
    messages: Vec<SentimentResult>,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        if config.min_token_length == 0 {
            return Err(ConfigError::InvalidMinTokenLength);
        }

        let stopwords = StopwordSet::resolve(
            config.stopwords.replace.as_deref(),
            &config.stopwords.extra,
        );
        let tokenizer = Tokenizer::new(stopwords, config.min_token_length);

        let thresholds = SentimentThresholds {
            positive: config.sentiment.positive_threshold,
            negative: config.sentiment.negative_threshold,
        };
        thresholds.validate()?;
        let lexicon = Lexicon::with_extra(
            &config.sentiment.extra_positive,
            &config.sentiment.extra_negative,
        )?;

        let mut themes = ThemeCatalog::builtin();
        for extra in &config.themes.extra_triggers {
            let theme: ThemeId = extra.theme.parse().map_err(ConfigError::UnknownTheme)?;
            let trigger = reachable_trigger(&tokenizer, &extra.trigger, extra.weight)?;
            themes.add_trigger(theme, trigger);
        }

        let mut opportunities = OpportunityCatalog::builtin();
        for extra in &config.opportunities.extra {
            let theme: ThemeId = extra.theme.parse().map_err(ConfigError::UnknownTheme)?;
            let key: SentimentKey = extra
                .sentiment
                .parse()
                .map_err(ConfigError::UnknownSentimentKey)?;
            opportunities.register(theme, key, &extra.text)?;
        }

        Ok(Self {
            tokenizer,
            scorer: SentimentScorer::new(lexicon, thresholds),
            themes,
            opportunities,
            top_n_keywords: config.top_n_keywords,
            top_n_bigrams: config.top_n_bigrams,
            top_k_themes: config.top_k_themes_for_opportunities,
        })
    }

    /// Analyzer with built-in catalogs and default settings.
    pub fn builtin() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            scorer: SentimentScorer::default(),
            themes: ThemeCatalog::builtin(),
            opportunities: OpportunityCatalog::builtin(),
            top_n_keywords: crate::config::models::DEFAULT_TOP_N_KEYWORDS,
            top_n_bigrams: crate::config::models::DEFAULT_TOP_N_BIGRAMS,
            top_k_themes: crate::analyzers::opportunity::DEFAULT_TOP_K_THEMES,
        }
    }

    pub fn analyze(&self, conversations: &[ConversationRecord]) -> AnalysisResult {
        tracing::info!("analyzing {} conversations", conversations.len());

        let mut keyword_counts = TermCounts::new();
        let mut bigram_counts = TermCounts::new();
        let mut message_sentiments = Vec::new();
        let mut distribution = SentimentDistribution::default();
        let mut conversation_sentiments = Vec::with_capacity(conversations.len());
        let mut coverage: Vec<CoverageEntry> = Vec::new();
        let mut unmatched_conversations = 0;

        for conv in conversations {
            let counts = self.count_conversation(conv);

            keyword_counts.merge(&counts.keywords);
            bigram_counts.merge(&counts.bigrams);
            for result in &counts.messages {
                distribution.record(result.label);
            }

            conversation_sentiments.push(ConversationSentiment {
                conversation_id: conv.id.clone(),
                title: conv.title.clone(),
                sentiment: self.scorer.aggregate(&counts.messages),
            });

            let matched = self.themes.matched_triggers(&counts.keywords, &counts.bigrams);
            if matched.is_empty() {
                unmatched_conversations += 1;
            }
            for (theme, hits) in matched {
                let entry = match coverage.iter().position(|e| e.theme == theme) {
                    Some(i) => &mut coverage[i],
                    None => {
                        coverage.push(CoverageEntry::new(theme));
                        let last = coverage.len() - 1;
                        &mut coverage[last]
                    }
                };
                entry.titles.push(conv.title.as_str());
                entry.keywords.merge(&hits);
            }

            message_sentiments.extend(counts.messages);
        }

        let overall_sentiment = self.scorer.aggregate(&message_sentiments);
        let theme_scores = self.themes.classify(&keyword_counts, &bigram_counts);
        let opportunities = self
            .opportunities
            .generate(&theme_scores, &overall_sentiment, self.top_k_themes);

        tracing::debug!(
            "{} distinct keywords, {} distinct bigrams, {} themes matched",
            keyword_counts.len(),
            bigram_counts.len(),
            theme_scores.len()
        );

        AnalysisResult {
            corpus_stats: corpus_stats(conversations, keyword_counts.total()),
            top_keywords: keyword_counts.top(self.top_n_keywords),
            top_bigrams: bigram_counts.top(self.top_n_bigrams),
            sentiment_guidance: sentiment_guidance(overall_sentiment.label).to_string(),
            overall_sentiment,
            sentiment_distribution: distribution,
            conversation_sentiments,
            theme_scores,
            theme_coverage: theme_coverage(coverage),
            unmatched_conversations,
            opportunities,
            timeline: build_timeline(conversations),
        }
    }

    fn count_conversation(&self, conv: &ConversationRecord) -> ConversationCounts {
        let mut keywords = TermCounts::new();
        let mut tokenized = Vec::with_capacity(conv.messages.len());
        let mut messages = Vec::with_capacity(conv.messages.len());

        for message in &conv.messages {
            let tokens = self.tokenizer.tokenize(&message.text);
            for token in &tokens {
                keywords.add(token);
            }
            tokenized.push(tokens);
            // negators are stopwords, so sentiment sees the unfiltered words
            messages.push(self.scorer.score(&self.tokenizer.words(&message.text)));
        }

        ConversationCounts {
            keywords,
            bigrams: count_bigrams(&tokenized),
            messages,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::builtin()
    }
}

fn corpus_stats(conversations: &[ConversationRecord], token_count: usize) -> CorpusStats {
    let participants: BTreeSet<&str> = conversations
        .iter()
        .flat_map(|c| c.participants.iter().map(String::as_str))
        .collect();
    let (first_interaction, last_interaction) = interaction_span(conversations);

    CorpusStats {
        conversation_count: conversations.len(),
        message_count: conversations.iter().map(|c| c.messages.len()).sum(),
        participant_count: participants.len(),
        participants: participants.into_iter().map(String::from).collect(),
        token_count,
        first_interaction,
        last_interaction,
    }
}

/// Rejects extra triggers the tokenizer would never produce, such as ones
/// containing a stopword or a word below the minimum length.
fn reachable_trigger(
    tokenizer: &Tokenizer,
    text: &str,
    weight: f64,
) -> Result<Trigger, ConfigError> {
    let trigger = Trigger::new(text, weight)?;
    let words = tokenizer.words(&trigger.text);
    if tokenizer.tokenize(&trigger.text) != words || words.join(" ") != trigger.text {
        return Err(ConfigError::UnreachableTrigger(text.to_string()));
    }
    Ok(trigger)
}

struct CoverageEntry<'a> {
    theme: ThemeId,
    titles: Vec<&'a str>,
    keywords: TermCounts,
}

impl CoverageEntry<'_> {
    fn new(theme: ThemeId) -> Self {
        Self {
            theme,
            titles: Vec::new(),
            keywords: TermCounts::new(),
        }
    }
}

/// Coverage in catalog order.
fn theme_coverage(mut coverage: Vec<CoverageEntry<'_>>) -> Vec<ThemeCoverage> {
    coverage.sort_by_key(|e| ThemeId::ALL.iter().position(|t| *t == e.theme));
    coverage
        .into_iter()
        .map(|entry| ThemeCoverage {
            theme: entry.theme,
            theme_name: entry.theme.display_name().to_string(),
            conversation_count: entry.titles.len(),
            example_titles: entry
                .titles
                .into_iter()
                .take(MAX_COVERAGE_ITEMS)
                .map(String::from)
                .collect(),
            top_keywords: entry
                .keywords
                .top(MAX_COVERAGE_ITEMS)
                .into_iter()
                .map(|(keyword, _)| keyword)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TemplateConfig, TriggerConfig};
    use crate::types::{Message, Role, SentimentLabel};

    fn conversation(id: &str, texts: &[&str]) -> ConversationRecord {
        let messages = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                Message::new(role, *t)
            })
            .collect();
        ConversationRecord::new(id, format!("Conversation {}", id), messages)
    }

    #[test]
    fn empty_corpus_is_valid() {
        let result = Analyzer::builtin().analyze(&[]);
        assert_eq!(result.corpus_stats, CorpusStats::default());
        assert!(result.top_keywords.is_empty());
        assert!(result.top_bigrams.is_empty());
        assert!(result.theme_scores.is_empty());
        assert!(result.opportunities.is_empty());
        assert_eq!(result.overall_sentiment.label, SentimentLabel::Neutral);
        assert!(!result.sentiment_guidance.is_empty());
        assert!(result.timeline.is_empty());
    }

    #[test]
    fn restaurant_corpus_end_to_end() {
        let corpus = vec![
            conversation(
                "1",
                &[
                    "Our Toast POS menu sync keeps failing, the kiosk shows the wrong menu.",
                    "Let's check the Toast POS integration logs for the menu update.",
                ],
            ),
            conversation("2", &["The kitchen display works great now, thanks!"]),
        ];
        let result = Analyzer::builtin().analyze(&corpus);

        assert_eq!(result.corpus_stats.conversation_count, 2);
        assert_eq!(result.corpus_stats.message_count, 3);
        assert_eq!(result.corpus_stats.participants, vec!["assistant", "user"]);
        assert_eq!(result.top_keywords[0], ("menu".to_string(), 3));

        let dominant = result.dominant_theme().unwrap();
        assert_eq!(dominant.theme, ThemeId::Restaurant);
        assert!(dominant.matched_keywords.contains("toast pos"));
        assert!(result
            .top_bigrams
            .contains(&("toast pos".to_string(), 2)));

        assert_eq!(result.conversation_sentiments.len(), 2);
        assert_eq!(
            result.conversation_sentiments[1].sentiment.label,
            SentimentLabel::Positive
        );
        assert_eq!(result.sentiment_distribution.total(), 3);

        let restaurant = result
            .theme_coverage
            .iter()
            .find(|c| c.theme == ThemeId::Restaurant)
            .unwrap();
        assert_eq!(restaurant.conversation_count, 2);
        assert_eq!(
            restaurant.example_titles,
            vec!["Conversation 1", "Conversation 2"]
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let corpus = vec![
            conversation("a", &["n8n workflow webhook broke again", "retry the webhook"]),
            conversation("b", &["react dashboard looks awesome"]),
        ];
        let analyzer = Analyzer::builtin();
        assert_eq!(analyzer.analyze(&corpus), analyzer.analyze(&corpus));
    }

    #[test]
    fn ties_follow_corpus_order() {
        let a = conversation("a", &["alpha gamma"]);
        let b = conversation("b", &["gamma alpha"]);
        let analyzer = Analyzer::builtin();

        let ab = analyzer.analyze(&[a.clone(), b.clone()]);
        let ba = analyzer.analyze(&[b, a]);
        let words = |r: &AnalysisResult| -> Vec<String> {
            r.top_keywords.iter().map(|(w, _)| w.clone()).collect()
        };
        assert_eq!(words(&ab), vec!["alpha", "gamma"]);
        assert_eq!(words(&ba), vec!["gamma", "alpha"]);
    }

    #[test]
    fn negation_survives_stopword_filtering() {
        let corpus = vec![conversation("a", &["This is not good"])];
        let result = Analyzer::builtin().analyze(&corpus);
        assert_eq!(result.overall_sentiment.label, SentimentLabel::Negative);
        assert!(!result.top_keywords.iter().any(|(w, _)| w == "not"));
        assert!(result.top_bigrams.is_empty());
    }

    #[test]
    fn coverage_keeps_top_triggers_and_counts_unmatched() {
        let corpus = vec![
            conversation("1", &["toast menu menu", "kiosk menu"]),
            conversation("2", &["menu refresh for the kitchen"]),
            conversation("3", &["weekend hiking plans"]),
            conversation("4", &["birthday cake recipe"]),
        ];
        let result = Analyzer::builtin().analyze(&corpus);

        assert_eq!(result.unmatched_conversations, 2);
        assert_eq!(result.theme_coverage.len(), 1);
        let restaurant = &result.theme_coverage[0];
        assert_eq!(restaurant.theme, ThemeId::Restaurant);
        assert_eq!(restaurant.conversation_count, 2);
        assert_eq!(restaurant.top_keywords, vec!["menu", "toast", "kiosk", "kitchen"]);
    }

    #[test]
    fn threshold_override_changes_labels() {
        // 3 positive hits, 1 negative: score 0.5
        let corpus = vec![conversation("a", &["great excellent love bug"])];
        let default = Analyzer::builtin().analyze(&corpus);
        assert_eq!(default.overall_sentiment.score, 0.5);
        assert_eq!(default.overall_sentiment.label, SentimentLabel::Positive);

        let mut config = AnalysisConfig::default();
        config.sentiment.positive_threshold = 0.6;
        let strict = Analyzer::new(&config).unwrap().analyze(&corpus);
        assert_eq!(strict.overall_sentiment.score, 0.5);
        assert_eq!(strict.overall_sentiment.label, SentimentLabel::Neutral);
        assert_eq!(strict.sentiment_distribution.neutral, 1);
        assert_eq!(
            strict.conversation_sentiments[0].sentiment.label,
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn triggers_the_tokenizer_cannot_produce_are_rejected() {
        let trigger = |theme: &str, text: &str| TriggerConfig {
            theme: theme.to_string(),
            trigger: text.to_string(),
            weight: 1.0,
        };
        let with_trigger = |t: TriggerConfig, min_token_length: usize| {
            let mut config = AnalysisConfig::default();
            config.min_token_length = min_token_length;
            config.themes.extra_triggers.push(t);
            Analyzer::new(&config)
        };

        // "api" is a stopword
        assert_eq!(
            with_trigger(trigger("automation", "api integration"), 2).unwrap_err(),
            ConfigError::UnreachableTrigger("api integration".to_string())
        );
        // below the minimum length
        assert!(matches!(
            with_trigger(trigger("restaurant", "pos terminal"), 4),
            Err(ConfigError::UnreachableTrigger(_))
        ));
        // punctuation the tokenizer splits on
        assert!(matches!(
            with_trigger(trigger("web-development", "c++"), 2),
            Err(ConfigError::UnreachableTrigger(_))
        ));

        let analyzer = with_trigger(trigger("consulting", "Follow-Up"), 2).unwrap();
        let result = analyzer.analyze(&[conversation("a", &["Booked a follow-up call"])]);
        assert_eq!(result.theme_scores[0].theme, ThemeId::Consulting);
    }

    #[test]
    fn config_overrides_apply() {
        let mut config = AnalysisConfig::default();
        config.top_n_keywords = 1;
        config.stopwords.extra.push("menu".to_string());
        config.themes.extra_triggers.push(TriggerConfig {
            theme: "consulting".to_string(),
            trigger: "roadmap".to_string(),
            weight: 4.0,
        });
        config.opportunities.extra.push(TemplateConfig {
            theme: "Consulting".to_string(),
            sentiment: "any".to_string(),
            text: "Sell roadmap workshops.".to_string(),
        });
        let analyzer = Analyzer::new(&config).unwrap();

        let result = analyzer.analyze(&[conversation("a", &["menu menu menu roadmap plan"])]);
        assert_eq!(result.top_keywords, vec![("roadmap".to_string(), 1)]);
        assert_eq!(result.theme_scores[0].theme, ThemeId::Consulting);
        assert_eq!(result.theme_scores[0].score, 4.0);
        assert_eq!(result.opportunities[0].text, "Sell roadmap workshops.");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.min_token_length = 0;
        assert_eq!(
            Analyzer::new(&config).unwrap_err(),
            ConfigError::InvalidMinTokenLength
        );

        let mut config = AnalysisConfig::default();
        config.themes.extra_triggers.push(TriggerConfig {
            theme: "gardening".to_string(),
            trigger: "roses".to_string(),
            weight: 1.0,
        });
        assert!(matches!(
            Analyzer::new(&config),
            Err(ConfigError::UnknownTheme(_))
        ));

        let mut config = AnalysisConfig::default();
        config.opportunities.extra.push(TemplateConfig {
            theme: "automation".to_string(),
            sentiment: "ecstatic".to_string(),
            text: "x".to_string(),
        });
        assert!(matches!(
            Analyzer::new(&config),
            Err(ConfigError::UnknownSentimentKey(_))
        ));

        let mut config = AnalysisConfig::default();
        config.sentiment.positive_threshold = -0.5;
        assert!(matches!(
            Analyzer::new(&config),
            Err(ConfigError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn default_config_matches_builtin() {
        let corpus = vec![conversation("a", &["google sheets data pipeline is slow and broken"])];
        assert_eq!(
            Analyzer::new(&AnalysisConfig::default()).unwrap().analyze(&corpus),
            Analyzer::builtin().analyze(&corpus)
        );
    }
}
