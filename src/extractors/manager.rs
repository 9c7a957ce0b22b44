//! ExtractorManager - Public API for symbol extraction
//!
//! Handles file parsing and delegates to the language-specific extractor.
//! Files in a language without a grammar get an empty record and are indexed
//! as plain text.

use crate::extractors::base::SymbolRecord;
use crate::extractors::csharp::CSharpExtractor;
use crate::language::{detect_language_from_extension, parse_source, SourceLanguage};

/// Stateless manager for the language extractors
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractorManager;

impl ExtractorManager {
    pub fn new() -> Self {
        Self
    }

    /// Extensions with structural extraction
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        vec!["cs"]
    }

    /// Extract the symbol record for a file's bytes.
    ///
    /// Never fails: a parse failure or an unsupported extension yields an
    /// all-empty record.
    pub fn extract(&self, extension: &str, source: &[u8]) -> SymbolRecord {
        let Some(language) = detect_language_from_extension(extension) else {
            return SymbolRecord::default();
        };

        let Some(tree) = parse_source(language, source) else {
            tracing::debug!("Failed to parse {} source, indexing without symbols", language.name());
            return SymbolRecord::default();
        };

        let record = match language {
            SourceLanguage::CSharp => CSharpExtractor::new(source).extract(&tree),
        };

        tracing::debug!(
            "Extracted {} types, {} members from {} source",
            record.class_names.len(),
            record.method_names.len(),
            language.name()
        );
        record
    }
}
