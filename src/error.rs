// Codesearch Error Types
//
// Parse failures and oversized files never reach this enum: extraction and
// queries degrade to empty results. Everything here crosses an operation
// boundary (bulk run, flush cycle, CLI command).

use std::path::PathBuf;

/// Unified error type for the index, the store client and the watcher
#[derive(Debug, thiserror::Error)]
pub enum CodeSearchError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document store unavailable at {url}: {message}. Is the server running?")]
    RemoteUnavailable { url: String, message: String },

    #[error("Document store returned {status} for {operation}: {body}")]
    RemoteStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Schema mismatch ({0}). Re-index with: codesearch index --reset")]
    SchemaMismatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodeSearchError {
    /// True for failures that mean the store could not be reached at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CodeSearchError::RemoteUnavailable { .. })
    }
}

impl From<notify::Error> for CodeSearchError {
    fn from(e: notify::Error) -> Self {
        CodeSearchError::Watch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodeSearchError>;
