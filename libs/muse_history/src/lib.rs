//! Generation history: the record model, the JSON-file backed store, search,
//! export and analytics.

pub mod analytics;
pub mod error;
pub mod export;
pub mod model;
pub mod search;
pub mod store;

pub use analytics::{summarize, AnalyticsOptions, AnalyticsReport, KeywordCount};
pub use error::{HistoryError, ValidationError};
pub use model::{
    parse_tags, Audience, ContentType, GenerationParams, GenerationRecord, Language, NewRecord,
    RhymeScheme, Tone, MAX_LENGTH_WORDS, MIN_LENGTH_WORDS,
};
pub use search::SearchQuery;
pub use store::{HistoryStore, Store, DEFAULT_HISTORY_FILE};
