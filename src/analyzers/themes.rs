use std::collections::BTreeSet;

use crate::analyzers::frequency::TermCounts;
use crate::error::ConfigError;
use crate::types::{ThemeId, ThemeScore};

const DEFAULT_WEIGHT: f64 = 1.0;

/// Built-in triggers per theme: (trigger, weight). Phrases are two words
/// in their tokenized form and are looked up among bigrams.
const BUILTIN_TRIGGERS: &[(ThemeId, &[(&str, f64)])] = &[
    (
        ThemeId::Restaurant,
        &[
            ("toast", DEFAULT_WEIGHT),
            ("restaurant", DEFAULT_WEIGHT),
            ("pos", DEFAULT_WEIGHT),
            ("menu", DEFAULT_WEIGHT),
            ("kiosk", DEFAULT_WEIGHT),
            ("order", DEFAULT_WEIGHT),
            ("kitchen", DEFAULT_WEIGHT),
            ("inventory", DEFAULT_WEIGHT),
            ("toast pos", 2.0),
        ],
    ),
    (
        ThemeId::Automation,
        &[
            ("n8n", DEFAULT_WEIGHT),
            ("automation", DEFAULT_WEIGHT),
            ("automate", DEFAULT_WEIGHT),
            ("workflow", DEFAULT_WEIGHT),
            ("workflows", DEFAULT_WEIGHT),
            ("webhook", DEFAULT_WEIGHT),
            ("trigger", DEFAULT_WEIGHT),
            ("zapier", DEFAULT_WEIGHT),
            ("n8n workflow", 2.0),
            ("workflow automation", 2.0),
        ],
    ),
    (
        ThemeId::FieldServices,
        &[
            ("cable", DEFAULT_WEIGHT),
            ("contractor", DEFAULT_WEIGHT),
            ("contractors", DEFAULT_WEIGHT),
            ("fiber", DEFAULT_WEIGHT),
            ("network", DEFAULT_WEIGHT),
            ("installation", DEFAULT_WEIGHT),
            ("field", DEFAULT_WEIGHT),
            ("truck", DEFAULT_WEIGHT),
            ("cape cod", 2.0),
            ("field service", 2.0),
        ],
    ),
    (
        ThemeId::Consulting,
        &[
            ("consulting", DEFAULT_WEIGHT),
            ("strategy", DEFAULT_WEIGHT),
            ("ccrc", DEFAULT_WEIGHT),
            ("client", DEFAULT_WEIGHT),
            ("clients", DEFAULT_WEIGHT),
            ("proposal", DEFAULT_WEIGHT),
            ("business plan", 2.0),
        ],
    ),
    (
        ThemeId::WebDevelopment,
        &[
            ("react", DEFAULT_WEIGHT),
            ("frontend", DEFAULT_WEIGHT),
            ("website", DEFAULT_WEIGHT),
            ("component", DEFAULT_WEIGHT),
            ("tailwind", DEFAULT_WEIGHT),
            ("typescript", DEFAULT_WEIGHT),
            ("ui", DEFAULT_WEIGHT),
            ("app", DEFAULT_WEIGHT),
            ("design system", 2.0),
        ],
    ),
    (
        ThemeId::DataReporting,
        &[
            ("data", DEFAULT_WEIGHT),
            ("pipeline", DEFAULT_WEIGHT),
            ("sheet", DEFAULT_WEIGHT),
            ("sheets", DEFAULT_WEIGHT),
            ("spreadsheet", DEFAULT_WEIGHT),
            ("dashboard", DEFAULT_WEIGHT),
            ("export", DEFAULT_WEIGHT),
            ("report", DEFAULT_WEIGHT),
            ("analytics", DEFAULT_WEIGHT),
            ("sync", DEFAULT_WEIGHT),
            ("google sheets", 2.0),
            ("data pipeline", 2.0),
        ],
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub text: String,
    pub weight: f64,
}

impl Trigger {
    pub fn new(text: &str, weight: f64) -> Result<Self, ConfigError> {
        let words: Vec<String> = text.split_whitespace().map(|w| w.to_lowercase()).collect();
        if words.is_empty() || words.len() > 2 {
            return Err(ConfigError::InvalidTrigger(text.to_string()));
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ConfigError::InvalidTriggerWeight {
                trigger: text.to_string(),
                weight,
            });
        }
        Ok(Self {
            text: words.join(" "),
            weight,
        })
    }

    fn is_phrase(&self) -> bool {
        self.text.contains(' ')
    }

    fn count_in(&self, keywords: &TermCounts, bigrams: &TermCounts) -> usize {
        if self.is_phrase() {
            bigrams.get(&self.text)
        } else {
            keywords.get(&self.text)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeDefinition {
    pub id: ThemeId,
    pub triggers: Vec<Trigger>,
}

/// Fixed theme catalog in declaration order.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<ThemeDefinition>,
}

impl ThemeCatalog {
    pub fn builtin() -> Self {
        let themes = BUILTIN_TRIGGERS
            .iter()
            .map(|(id, triggers)| ThemeDefinition {
                id: *id,
                triggers: triggers
                    .iter()
                    .map(|(text, weight)| Trigger {
                        text: text.to_string(),
                        weight: *weight,
                    })
                    .collect(),
            })
            .collect();
        Self { themes }
    }

    /// Add a trigger to an existing theme. A trigger already present gets the new weight.
    pub fn add_trigger(&mut self, theme: ThemeId, trigger: Trigger) {
        if let Some(def) = self.themes.iter_mut().find(|d| d.id == theme) {
            match def.triggers.iter_mut().find(|t| t.text == trigger.text) {
                Some(existing) => existing.weight = trigger.weight,
                None => def.triggers.push(trigger),
            }
        }
    }

    pub fn themes(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    /// Score every theme against corpus counts.
    /// Descending by score, ties in catalog order, zero-score themes left out.
    pub fn classify(
        &self,
        keyword_counts: &TermCounts,
        bigram_counts: &TermCounts,
    ) -> Vec<ThemeScore> {
        let mut scores: Vec<ThemeScore> = self
            .themes
            .iter()
            .filter_map(|def| {
                let mut score = 0.0;
                let mut matched = BTreeSet::new();
                for trigger in &def.triggers {
                    let count = trigger.count_in(keyword_counts, bigram_counts);
                    if count > 0 {
                        score += count as f64 * trigger.weight;
                        matched.insert(trigger.text.clone());
                    }
                }
                (score > 0.0).then(|| ThemeScore::new(def.id, score, matched))
            })
            .collect();

        // stable: equal scores keep catalog order
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores
    }

    /// Triggers found in the given counts, with their counts, grouped by
    /// theme. Catalog order; themes without hits are left out.
    pub fn matched_triggers(
        &self,
        keyword_counts: &TermCounts,
        bigram_counts: &TermCounts,
    ) -> Vec<(ThemeId, TermCounts)> {
        self.themes
            .iter()
            .filter_map(|def| {
                let mut hits = TermCounts::new();
                for trigger in &def.triggers {
                    hits.add_n(&trigger.text, trigger.count_in(keyword_counts, bigram_counts));
                }
                (!hits.is_empty()).then_some((def.id, hits))
            })
            .collect()
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
