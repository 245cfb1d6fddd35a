pub mod analyzers;
pub mod commands;
pub mod config;
pub mod error;
pub mod parsers;
pub mod report;
pub mod tokenizer;
pub mod types;

pub use analyzers::Analyzer;
pub use config::AnalysisConfig;
pub use error::ConfigError;
pub use types::{AnalysisResult, ConversationRecord, Message, Role};
