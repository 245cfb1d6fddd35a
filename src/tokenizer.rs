//! Word tokenization
//!
//! Text is lower-cased, the typographic apostrophe is folded to `'`, and
//! words are taken with [`WORD_PATTERN`]. Apostrophes and hyphens are kept
//! only between alphanumerics, so `don't` and `follow-up` stay whole while
//! quotes and dashes around a word are dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::analyzers::stopwords::StopwordSet;

/// Minimum token length (in chars) kept by default.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 2;

/// The fixed word pattern, applied to lower-cased text.
pub const WORD_PATTERN: &str = r"[a-z0-9]+(?:['-][a-z0-9]+)*";

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(WORD_PATTERN).unwrap());

#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: StopwordSet,
    min_length: usize,
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet, min_length: usize) -> Self {
        Self {
            stopwords,
            min_length,
        }
    }

    /// Normalized words with stopwords and short tokens removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        words(text)
            .into_iter()
            .filter(|w| w.chars().count() >= self.min_length)
            .filter(|w| !self.stopwords.contains(w))
            .collect()
    }

    /// Normalized words, unfiltered. Sentiment scoring needs negators such as "not".
    pub fn words(&self, text: &str) -> Vec<String> {
        words(text)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopwordSet::builtin(), DEFAULT_MIN_TOKEN_LENGTH)
    }
}

fn words(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
