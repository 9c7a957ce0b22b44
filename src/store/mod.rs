//! Document store access.
//!
//! [`DocumentStore`] is the seam between indexing logic and the remote
//! full-text server. [`TypesenseStore`] speaks the Typesense HTTP API; tests
//! use an in-memory implementation.

#[cfg(test)]
pub mod memory;
pub mod schema;
pub mod typesense;

use crate::document::IndexDocument;
use crate::error::Result;
use crate::search::SearchResponse;

pub use typesense::TypesenseStore;

/// Per-document outcome of a batch import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    /// Error messages for the failed documents
    pub errors: Vec<String>,
}

/// Collection metadata reported by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    pub name: String,
    pub num_documents: u64,
}

/// Operations the indexer, watcher and CLI need from the store
pub trait DocumentStore: Send + Sync {
    /// Is the server up and answering?
    fn health(&self) -> Result<bool>;

    /// `None` when the collection does not exist
    fn collection_stats(&self) -> Result<Option<CollectionStats>>;

    /// Create the collection if missing; drop and recreate it when `reset`
    fn ensure_collection(&self, reset: bool) -> Result<()>;

    /// Insert-or-replace every document in one call
    fn import_upsert(&self, docs: &[IndexDocument]) -> Result<ImportSummary>;

    /// `Ok(false)` when the document did not exist
    fn delete_document(&self, id: &str) -> Result<bool>;

    fn search(&self, params: &[(String, String)]) -> Result<SearchResponse>;
}
