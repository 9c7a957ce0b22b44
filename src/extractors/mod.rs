//! Language Extractors Module
//!
//! Tree-sitter based symbol extraction. Each extractor walks a parsed tree
//! once and produces a [`SymbolRecord`] for the file.
//!
//! # Architecture
//!
//! - `base` - SymbolRecord, kind tables, node text and traversal helpers
//! - `manager` - ExtractorManager public API (extension dispatch)
//! - `csharp` - C# extractor and the node accessors the query engine reuses

pub mod base;
pub mod csharp;
pub mod manager;

// Re-export the public API
pub use base::SymbolRecord;
pub use manager::ExtractorManager;
