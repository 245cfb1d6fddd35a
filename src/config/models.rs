use serde::{Deserialize, Serialize};

use crate::analyzers::opportunity::DEFAULT_TOP_K_THEMES;
use crate::analyzers::sentiment::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
use crate::tokenizer::DEFAULT_MIN_TOKEN_LENGTH;

pub const DEFAULT_TOP_N_KEYWORDS: usize = 15;
pub const DEFAULT_TOP_N_BIGRAMS: usize = 10;

/// Analysis settings. Every field is optional in a config file; missing
/// fields take the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_n_keywords: usize,
    pub top_n_bigrams: usize,
    /// How many of the top themes feed opportunity generation
    pub top_k_themes_for_opportunities: usize,
    pub min_token_length: usize,
    pub stopwords: StopwordConfig,
    pub sentiment: SentimentConfig,
    pub themes: ThemeConfig,
    pub opportunities: OpportunityConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n_keywords: DEFAULT_TOP_N_KEYWORDS,
            top_n_bigrams: DEFAULT_TOP_N_BIGRAMS,
            top_k_themes_for_opportunities: DEFAULT_TOP_K_THEMES,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            stopwords: StopwordConfig::default(),
            sentiment: SentimentConfig::default(),
            themes: ThemeConfig::default(),
            opportunities: OpportunityConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Apply individual CLI overrides on top of the current config.
    pub fn apply_overrides(
        &mut self,
        top_keywords: Option<usize>,
        top_bigrams: Option<usize>,
        top_themes: Option<usize>,
        min_token_length: Option<usize>,
        extra_stopwords: &[String],
    ) {
        if let Some(v) = top_keywords {
            self.top_n_keywords = v;
        }
        if let Some(v) = top_bigrams {
            self.top_n_bigrams = v;
        }
        if let Some(v) = top_themes {
            self.top_k_themes_for_opportunities = v;
        }
        if let Some(v) = min_token_length {
            self.min_token_length = v;
        }
        self.stopwords.extra.extend(extra_stopwords.iter().cloned());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwordConfig {
    /// Replaces the built-in stopword list entirely when set
    pub replace: Option<Vec<String>>,
    /// Added on top of the built-in (or replacement) list
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub positive_threshold: f64,
    pub negative_threshold: f64,
    pub extra_positive: Vec<String>,
    pub extra_negative: Vec<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: POSITIVE_THRESHOLD,
            negative_threshold: NEGATIVE_THRESHOLD,
            extra_positive: Vec::new(),
            extra_negative: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub extra_triggers: Vec<TriggerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Theme slug or display name
    pub theme: String,
    pub trigger: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityConfig {
    pub extra: Vec<TemplateConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub theme: String,
    /// any, positive, neutral or negative
    #[serde(default = "default_sentiment_key")]
    pub sentiment: String,
    pub text: String,
}

fn default_sentiment_key() -> String {
    "any".to_string()
}
