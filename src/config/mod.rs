pub mod loader;
pub mod models;

pub use models::{
    AnalysisConfig, OpportunityConfig, SentimentConfig, StopwordConfig, TemplateConfig,
    ThemeConfig, TriggerConfig,
};
