//! Keyword search over discovered faculties
//!
//! # Components
//!
//! - `tokenizer`: query preprocessing with synonym expansion, index keyword extraction
//! - `indexer`: index row building and retrying rebuilds
//! - `engine`: relevance ranking, suggestions and diagnostics

mod engine;
mod indexer;
mod tokenizer;

pub use engine::{SearchDebugInfo, SearchEngine, SearchResult, SearchType};
pub use indexer::{
    build_index_rows, IndexInput, Indexer, RebuildSummary, RetryPolicy, DESCRIPTION_PREVIEW_CHARS,
};
pub use tokenizer::{extract_keywords, preprocess, INDEX_STOPWORDS, QUERY_STOPWORDS, SYNONYMS};
