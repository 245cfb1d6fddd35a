use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Input records ---

/// Author role of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Map an export's raw author role onto the closed role set.
    /// Tool output is produced on the assistant side of a turn.
    pub fn from_author(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "user" | "human" => Role::User,
            "assistant" | "tool" | "model" => Role::Assistant,
            _ => Role::System,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    /// Missing or unreadable text is stored as an empty string.
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// One exported conversation. Messages are kept in turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub participants: BTreeSet<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConversationRecord {
    /// Build a record whose participants are the roles of its messages.
    pub fn new(id: impl Into<String>, title: impl Into<String>, messages: Vec<Message>) -> Self {
        let participants = messages.iter().map(|m| m.role.to_string()).collect();
        Self {
            id: id.into(),
            title: title.into(),
            messages,
            participants,
            created_at: None,
            updated_at: None,
        }
    }
}

// --- Catalog keys ---

/// Closed set of business themes known to the theme and opportunity catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    Restaurant,
    Automation,
    FieldServices,
    Consulting,
    WebDevelopment,
    DataReporting,
}

impl ThemeId {
    /// Catalog declaration order. Ties between equal theme scores follow it.
    pub const ALL: [ThemeId; 6] = [
        ThemeId::Restaurant,
        ThemeId::Automation,
        ThemeId::FieldServices,
        ThemeId::Consulting,
        ThemeId::WebDevelopment,
        ThemeId::DataReporting,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ThemeId::Restaurant => "restaurant",
            ThemeId::Automation => "automation",
            ThemeId::FieldServices => "field-services",
            ThemeId::Consulting => "consulting",
            ThemeId::WebDevelopment => "web-development",
            ThemeId::DataReporting => "data-reporting",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeId::Restaurant => "Restaurant Operations & Toast POS",
            ThemeId::Automation => "Workflow Automation & n8n",
            ThemeId::FieldServices => "Cape Cod Cable & Field Services",
            ThemeId::Consulting => "Business Consulting & Strategy",
            ThemeId::WebDevelopment => "Web & Application Development",
            ThemeId::DataReporting => "Data Integration & Reporting",
        }
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for ThemeId {
    type Err = String;

    /// Accepts the slug or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ThemeId::ALL
            .into_iter()
            .find(|t| t.slug() == wanted || t.display_name().to_lowercase() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ThemeId::ALL.iter().map(|t| t.slug()).collect();
                format!("unknown theme '{}': expected one of {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            _ => Err(format!(
                "invalid sentiment label '{}': expected positive, neutral, or negative",
                s
            )),
        }
    }
}

// --- Analysis output ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// Bounded to [-1.0, 1.0]
    pub score: f64,
    pub label: SentimentLabel,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            positive_hits: 0,
            negative_hits: 0,
        }
    }
}

/// Message counts per sentiment label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSentiment {
    pub conversation_id: String,
    pub title: String,
    pub sentiment: SentimentResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeScore {
    pub theme: ThemeId,
    pub theme_name: String,
    pub score: f64,
    pub matched_keywords: BTreeSet<String>,
}

impl ThemeScore {
    pub fn new(theme: ThemeId, score: f64, matched_keywords: BTreeSet<String>) -> Self {
        Self {
            theme,
            theme_name: theme.display_name().to_string(),
            score,
            matched_keywords,
        }
    }
}

/// How many conversations touched a theme, with a few example titles and
/// the triggers that matched most often.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCoverage {
    pub theme: ThemeId,
    pub theme_name: String,
    pub conversation_count: usize,
    pub example_titles: Vec<String>,
    /// Most frequent matched triggers across those conversations
    pub top_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityStatement {
    pub theme: ThemeId,
    pub theme_name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// `YYYY-MM`, UTC
    pub month: String,
    pub conversations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub conversation_count: usize,
    pub message_count: usize,
    pub participant_count: usize,
    pub participants: Vec<String>,
    pub token_count: usize,
    pub first_interaction: Option<DateTime<Utc>>,
    pub last_interaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub corpus_stats: CorpusStats,
    pub top_keywords: Vec<(String, usize)>,
    pub top_bigrams: Vec<(String, usize)>,
    pub overall_sentiment: SentimentResult,
    pub sentiment_distribution: SentimentDistribution,
    pub conversation_sentiments: Vec<ConversationSentiment>,
    /// Descending by score
    pub theme_scores: Vec<ThemeScore>,
    pub theme_coverage: Vec<ThemeCoverage>,
    /// Conversations that matched no theme
    pub unmatched_conversations: usize,
    pub opportunities: Vec<OpportunityStatement>,
    pub sentiment_guidance: String,
    pub timeline: Vec<TimelinePoint>,
}

impl AnalysisResult {
    /// Highest-scoring theme. `None` when no theme matched.
    pub fn dominant_theme(&self) -> Option<&ThemeScore> {
        self.theme_scores.first()
    }
}
