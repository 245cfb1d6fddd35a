use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{SentimentLabel, SentimentResult};

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.15;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.15;

/// Longest lexicon phrase, in words.
const MAX_PHRASE_WORDS: usize = 3;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "benefit", "efficient", "excellent", "excited", "faster", "good",
    "great", "growth", "happy", "help", "helpful", "improve", "improved", "improvement",
    "insight", "love", "optimistic", "optimize", "positive", "productive", "success",
    "successful", "support", "win",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "bad", "blocked", "broken", "bug", "bugs", "challenge", "complex", "concern",
    "confused", "conflict", "delay", "difficult", "error", "fail", "failed", "failure",
    "frustrated", "hard", "issue", "issues", "negative", "poor", "problem", "problems",
    "risk", "slow",
];

/// Phrases are matched before single words and consume their tokens.
const POSITIVE_PHRASES: &[&str] = &[
    "no problem",
    "no issues",
    "not bad",
    "not difficult",
    "well done",
    "works great",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "doesn't work",
    "no progress",
    "not good",
    "not great",
    "not helpful",
    "not working",
    "too slow",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
}

/// Label boundaries. Scores equal to a boundary are neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: POSITIVE_THRESHOLD,
            negative: NEGATIVE_THRESHOLD,
        }
    }
}

impl SentimentThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |v: f64| v.is_finite() && (-1.0..=1.0).contains(&v);
        if !in_range(self.positive) || !in_range(self.negative) || self.negative > self.positive {
            return Err(ConfigError::InvalidThresholds {
                positive: self.positive,
                negative: self.negative,
            });
        }
        Ok(())
    }

    pub fn label(&self, score: f64) -> SentimentLabel {
        if score > self.positive {
            SentimentLabel::Positive
        } else if score < self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Positive/negative words and phrases.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, Polarity>,
    phrases: HashMap<String, Polarity>,
    max_phrase_words: usize,
}

impl Lexicon {
    pub fn builtin() -> Self {
        let mut lexicon = Self {
            words: HashMap::new(),
            phrases: HashMap::new(),
            max_phrase_words: 1,
        };
        for entry in POSITIVE_WORDS.iter().chain(POSITIVE_PHRASES) {
            lexicon.insert(entry, Polarity::Positive);
        }
        for entry in NEGATIVE_WORDS.iter().chain(NEGATIVE_PHRASES) {
            lexicon.insert(entry, Polarity::Negative);
        }
        lexicon
    }

    /// Built-in lexicon plus configured entries. An entry may not carry both polarities.
    pub fn with_extra(positive: &[String], negative: &[String]) -> Result<Self, ConfigError> {
        let mut lexicon = Self::builtin();
        let positive = normalize_entries(positive)?;
        let negative = normalize_entries(negative)?;

        let positive_set: HashSet<&String> = positive.iter().collect();
        if let Some(dup) = negative.iter().find(|e| positive_set.contains(e)) {
            return Err(ConfigError::ConflictingLexiconEntry(dup.clone()));
        }
        for entry in &positive {
            if lexicon.polarity_of(entry) == Some(Polarity::Negative) {
                return Err(ConfigError::ConflictingLexiconEntry(entry.clone()));
            }
        }
        for entry in &negative {
            if lexicon.polarity_of(entry) == Some(Polarity::Positive) {
                return Err(ConfigError::ConflictingLexiconEntry(entry.clone()));
            }
        }

        for entry in &positive {
            lexicon.insert(entry, Polarity::Positive);
        }
        for entry in &negative {
            lexicon.insert(entry, Polarity::Negative);
        }
        Ok(lexicon)
    }

    fn insert(&mut self, entry: &str, polarity: Polarity) {
        let word_count = entry.split(' ').count();
        if word_count > 1 {
            self.max_phrase_words = self.max_phrase_words.max(word_count);
            self.phrases.insert(entry.to_string(), polarity);
        } else {
            self.words.insert(entry.to_string(), polarity);
        }
    }

    fn polarity_of(&self, entry: &str) -> Option<Polarity> {
        self.words
            .get(entry)
            .or_else(|| self.phrases.get(entry))
            .copied()
    }

    /// Count (positive, negative) hits. Longest phrase wins at each position.
    fn count_hits<S: AsRef<str>>(&self, tokens: &[S]) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;
        let mut i = 0;

        'scan: while i < tokens.len() {
            for len in (2..=self.max_phrase_words).rev() {
                if i + len > tokens.len() {
                    continue;
                }
                let key = tokens[i..i + len]
                    .iter()
                    .map(|t| t.as_ref())
                    .collect::<Vec<_>>()
                    .join(" ");
                if let Some(polarity) = self.phrases.get(&key) {
                    match polarity {
                        Polarity::Positive => positive += 1,
                        Polarity::Negative => negative += 1,
                    }
                    i += len;
                    continue 'scan;
                }
            }

            match self.words.get(tokens[i].as_ref()) {
                Some(Polarity::Positive) => positive += 1,
                Some(Polarity::Negative) => negative += 1,
                None => {}
            }
            i += 1;
        }

        (positive, negative)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_entries(entries: &[String]) -> Result<Vec<String>, ConfigError> {
    entries
        .iter()
        .map(|raw| {
            let words: Vec<String> = raw
                .split_whitespace()
                .map(|w| w.to_lowercase().replace('\u{2019}', "'"))
                .collect();
            if words.is_empty() || words.len() > MAX_PHRASE_WORDS {
                return Err(ConfigError::InvalidLexiconEntry(raw.clone()));
            }
            Ok(words.join(" "))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: Lexicon,
    thresholds: SentimentThresholds,
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon, thresholds: SentimentThresholds) -> Self {
        Self {
            lexicon,
            thresholds,
        }
    }

    /// (pos - neg) / max(1, pos + neg), bounded to [-1, 1].
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> SentimentResult {
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }
        let (positive_hits, negative_hits) = self.lexicon.count_hits(tokens);
        let denominator = (positive_hits + negative_hits).max(1) as f64;
        let score = ((positive_hits as f64 - negative_hits as f64) / denominator).clamp(-1.0, 1.0);

        SentimentResult {
            score,
            label: self.thresholds.label(score),
            positive_hits,
            negative_hits,
        }
    }

    /// Mean of the per-message scores; hit counts are summed.
    /// Messages without hits count as 0.0 in the mean.
    pub fn aggregate(&self, results: &[SentimentResult]) -> SentimentResult {
        if results.is_empty() {
            return SentimentResult::neutral();
        }
        let score = (results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64)
            .clamp(-1.0, 1.0);

        SentimentResult {
            score,
            label: self.thresholds.label(score),
            positive_hits: results.iter().map(|r| r.positive_hits).sum(),
            negative_hits: results.iter().map(|r| r.negative_hits).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::default()
    }

    #[test]
    fn three_positive_one_negative() {
        let tokens = ["great", "excellent", "love", "bug", "menu"];
        let result = scorer().score(&tokens);
        assert_eq!(result.positive_hits, 3);
        assert_eq!(result.negative_hits, 1);
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn empty_tokens_are_neutral() {
        let result = scorer().score::<&str>(&[]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.positive_hits + result.negative_hits, 0);
    }

    #[test]
    fn no_hits_is_zero() {
        let result = scorer().score(&["toast", "menu"]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn negation_phrase_consumes_positive_word() {
        let result = scorer().score(&["it", "is", "not", "good"]);
        assert_eq!(result.positive_hits, 0);
        assert_eq!(result.negative_hits, 1);
        assert_eq!(result.label, SentimentLabel::Negative);

        let result = scorer().score(&["not", "bad", "at", "all"]);
        assert_eq!(result.positive_hits, 1);
        assert_eq!(result.negative_hits, 0);
    }

    #[test]
    fn boundaries_resolve_to_neutral() {
        let thresholds = SentimentThresholds::default();
        assert_eq!(thresholds.label(0.15), SentimentLabel::Neutral);
        assert_eq!(thresholds.label(-0.15), SentimentLabel::Neutral);
        assert_eq!(thresholds.label(0.1500001), SentimentLabel::Positive);
        assert_eq!(thresholds.label(-0.1500001), SentimentLabel::Negative);
        assert_eq!(thresholds.label(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn corpus_aggregation_is_mean_of_message_scores() {
        let s = scorer();
        let messages = [s.score(&["great"]), s.score(&["menu", "kiosk"])];
        let overall = s.aggregate(&messages);
        // mean(1.0, 0.0) rather than the pooled-hit score of 1.0
        assert!((overall.score - 0.5).abs() < 1e-9);
        assert_eq!(overall.positive_hits, 1);
        assert_eq!(overall.negative_hits, 0);
        assert_eq!(overall.label, SentimentLabel::Positive);
    }

    #[test]
    fn aggregate_of_nothing_is_neutral() {
        assert_eq!(scorer().aggregate(&[]), SentimentResult::neutral());
    }

    #[test]
    fn extra_entries_extend_lexicon() {
        let lexicon = Lexicon::with_extra(
            &["Smooth".to_string(), "ships on time".to_string()],
            &["outage".to_string()],
        )
        .unwrap();
        let s = SentimentScorer::new(lexicon, SentimentThresholds::default());
        let result = s.score(&["smooth", "outage", "ships", "on", "time"]);
        assert_eq!(result.positive_hits, 2);
        assert_eq!(result.negative_hits, 1);
    }

    #[test]
    fn conflicting_entries_are_rejected() {
        let err = Lexicon::with_extra(&["great".to_string()], &["great".to_string()]).unwrap_err();
        assert_eq!(err, ConfigError::ConflictingLexiconEntry("great".to_string()));

        let err = Lexicon::with_extra(&["bug".to_string()], &[]).unwrap_err();
        assert_eq!(err, ConfigError::ConflictingLexiconEntry("bug".to_string()));

        let err = Lexicon::with_extra(&[], &["   ".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLexiconEntry(_)));
    }

    #[test]
    fn invalid_thresholds() {
        let bad = SentimentThresholds {
            positive: -0.2,
            negative: 0.2,
        };
        assert!(bad.validate().is_err());
        assert!(SentimentThresholds::default().validate().is_ok());
    }
}
