use std::collections::HashMap;

use crate::error::ConfigError;
use crate::types::{OpportunityStatement, SentimentLabel, SentimentResult, ThemeId, ThemeScore};

/// Themes considered for opportunities by default.
pub const DEFAULT_TOP_K_THEMES: usize = 3;

/// Sentiment half of an opportunity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentKey {
    Any,
    Label(SentimentLabel),
}

impl std::str::FromStr for SentimentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "" => Ok(SentimentKey::Any),
            other => other.parse::<SentimentLabel>().map(SentimentKey::Label).map_err(|_| {
                format!(
                    "invalid sentiment key '{}': expected any, positive, neutral, or negative",
                    s
                )
            }),
        }
    }
}

pub type OpportunityKey = (ThemeId, SentimentKey);

/// Built-in templates. Coverage is intentionally partial; a theme without
/// a matching entry produces nothing.
const BUILTIN_TEMPLATES: &[(ThemeId, SentimentKey, &str)] = &[
    (
        ThemeId::Restaurant,
        SentimentKey::Any,
        "Develop a modular Toast POS integration toolkit with menu syncing, analytics, and deployment playbooks.",
    ),
    (
        ThemeId::Restaurant,
        SentimentKey::Label(SentimentLabel::Negative),
        "Build automated integration tests and menu-update tooling to stabilize Toast POS deployments.",
    ),
    (
        ThemeId::Automation,
        SentimentKey::Any,
        "Package reusable n8n workflow templates for lead capture, CRM sync, and operations automation.",
    ),
    (
        ThemeId::Automation,
        SentimentKey::Label(SentimentLabel::Negative),
        "Offer workflow monitoring dashboards that surface failing automations before clients notice.",
    ),
    (
        ThemeId::Automation,
        SentimentKey::Label(SentimentLabel::Negative),
        "Create a troubleshooting playbook for webhook and trigger failures in n8n.",
    ),
    (
        ThemeId::FieldServices,
        SentimentKey::Any,
        "Create a field operations dashboard for cable installations with scheduling and hardware inventory tracking.",
    ),
    (
        ThemeId::Consulting,
        SentimentKey::Label(SentimentLabel::Positive),
        "Build a consulting discovery workspace to consolidate proposals, research, and financial models.",
    ),
    (
        ThemeId::WebDevelopment,
        SentimentKey::Any,
        "Launch a design system starter kit and scaffolding CLI for rapid client application prototypes.",
    ),
    (
        ThemeId::DataReporting,
        SentimentKey::Any,
        "Offer a data pipeline accelerator combining Google Sheets, databases, and BI dashboards.",
    ),
    (
        ThemeId::DataReporting,
        SentimentKey::Label(SentimentLabel::Negative),
        "Offer a data observability layer that tracks freshness, schema changes, and business KPIs across exports.",
    ),
];

/// One corpus-level recommendation per overall sentiment label.
const SENTIMENT_GUIDANCE: &[(SentimentLabel, &str)] = &[
    (
        SentimentLabel::Positive,
        "Sentiment trends positive; consider launching premium services or bundled offerings while momentum is high.",
    ),
    (
        SentimentLabel::Neutral,
        "Sentiment is mixed; introduce regular check-ins and success stories to reinforce positive outcomes.",
    ),
    (
        SentimentLabel::Negative,
        "Sentiment skews negative; prioritize customer feedback loops and dedicate sprints to support and quality fixes.",
    ),
];

pub fn sentiment_guidance(label: SentimentLabel) -> &'static str {
    SENTIMENT_GUIDANCE
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

/// Opportunity templates keyed by (theme, sentiment).
#[derive(Debug, Clone)]
pub struct OpportunityCatalog {
    templates: HashMap<OpportunityKey, Vec<String>>,
}

impl OpportunityCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (theme, key, text) in BUILTIN_TEMPLATES {
            catalog
                .templates
                .entry((*theme, *key))
                .or_default()
                .push(text.to_string());
        }
        catalog
    }

    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Append a template after any existing ones for the same key.
    pub fn register(
        &mut self,
        theme: ThemeId,
        key: SentimentKey,
        text: &str,
    ) -> Result<(), ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigError::EmptyTemplate(theme.slug().to_string()));
        }
        self.templates
            .entry((theme, key))
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    /// Label-specific templates win over the theme's `Any` templates.
    pub fn lookup(&self, theme: ThemeId, label: SentimentLabel) -> &[String] {
        self.templates
            .get(&(theme, SentimentKey::Label(label)))
            .or_else(|| self.templates.get(&(theme, SentimentKey::Any)))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Statements for the first `top_k` themes, in theme order.
    pub fn generate(
        &self,
        theme_scores: &[ThemeScore],
        sentiment: &SentimentResult,
        top_k: usize,
    ) -> Vec<OpportunityStatement> {
        theme_scores
            .iter()
            .take(top_k)
            .flat_map(|ts| {
                self.lookup(ts.theme, sentiment.label)
                    .iter()
                    .map(move |text| OpportunityStatement {
                        theme: ts.theme,
                        theme_name: ts.theme_name.clone(),
                        text: text.clone(),
                    })
            })
            .collect()
    }
}

impl Default for OpportunityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
