// Codesearch - structural C# index over a Typesense document store
//
// Extraction and queries run on tree-sitter syntax trees; the bulk indexer
// and the watcher keep one document per source file in the store.

pub mod bulk;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod language;
pub mod query;
pub mod search;
pub mod store;
pub mod utils;
pub mod watcher;

pub use config::Config;
pub use error::{CodeSearchError, Result};
