//! Language Support - tree-sitter configuration for the indexed languages
//!
//! Only C# gets a syntax tree. Every other tracked extension is indexed as
//! plain text and gets an empty symbol record.

use tree_sitter::{Language, Parser, Tree};
use tracing::debug;

/// Languages the index knows how to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    CSharp,
}

impl SourceLanguage {
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::CSharp => "csharp",
        }
    }

    /// The tree-sitter grammar for this language
    pub fn grammar(&self) -> Language {
        match self {
            SourceLanguage::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }
}

/// Detect a parseable language from a file extension (with or without the dot)
pub fn detect_language_from_extension(extension: &str) -> Option<SourceLanguage> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "cs" => Some(SourceLanguage::CSharp),
        _ => None,
    }
}

/// Parse source bytes into a fresh tree.
///
/// Each call builds its own parser, so trees are never shared between
/// threads. Returns `None` when the grammar cannot be loaded or tree-sitter
/// gives up; callers treat that as "no symbols".
pub fn parse_source(language: SourceLanguage, source: &[u8]) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&language.grammar()) {
        debug!("Failed to set parser language for {}: {}", language.name(), e);
        return None;
    }
    parser.parse(source, None)
}

/// Shorthand for the only grammar with structural queries
pub fn parse_csharp(source: &[u8]) -> Option<Tree> {
    parse_source(SourceLanguage::CSharp, source)
}
