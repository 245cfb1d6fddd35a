use thiserror::Error;

/// Fatal configuration problems, raised before any conversation is analyzed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0}")]
    UnknownTheme(String),

    #[error("{0}")]
    UnknownSentimentKey(String),

    #[error("trigger '{trigger}' has invalid weight {weight}: must be finite and > 0")]
    InvalidTriggerWeight { trigger: String, weight: f64 },

    #[error("trigger '{0}' must be one word or a two-word phrase")]
    InvalidTrigger(String),

    #[error("trigger '{0}' can never match: tokenizing it drops or splits words")]
    UnreachableTrigger(String),

    #[error("lexicon entry '{0}' must contain one to three words")]
    InvalidLexiconEntry(String),

    #[error("'{0}' is listed as both positive and negative")]
    ConflictingLexiconEntry(String),

    #[error(
        "invalid sentiment thresholds (positive {positive}, negative {negative}): \
         expected -1 <= negative <= positive <= 1"
    )]
    InvalidThresholds { positive: f64, negative: f64 },

    #[error("empty opportunity template for theme '{0}'")]
    EmptyTemplate(String),

    #[error("min_token_length must be at least 1")]
    InvalidMinTokenLength,
}
