// Re-export main components
pub mod analyze;
pub mod api;
pub mod corpus;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod select;

// Re-export commonly used types
pub use analyze::{Analyzer, Normalizer, Tokenizer};
pub use corpus::Art;
pub use document::{DocId, Indexable};
pub use engine::{SearchConfig, SearchEngine};
pub use index::InvertedIndex;
pub use query::{Query, evaluate};
pub use select::{SelectionMode, Selector, select_one};

// Re-export error types
pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
