pub mod frequency;
pub mod opportunity;
pub mod pipeline;
pub mod sentiment;
pub mod stopwords;
pub mod themes;
pub mod timeline;

pub use frequency::{count_bigrams, top_bigrams, top_terms, TermCounts};
pub use opportunity::{sentiment_guidance, OpportunityCatalog, SentimentKey};
pub use pipeline::Analyzer;
pub use sentiment::{Lexicon, SentimentScorer, SentimentThresholds};
pub use stopwords::StopwordSet;
pub use themes::{ThemeCatalog, Trigger};
pub use timeline::{build_timeline, interaction_span};
