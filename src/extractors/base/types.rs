// Base Extractor Types
//
// SymbolRecord plus the node-kind tables shared by extraction and queries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Type declaration node kinds (C# grammar)
pub const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "struct_declaration",
    "enum_declaration",
    "record_declaration",
    "record_struct_declaration",
    "delegate_declaration",
];

/// Member declaration node kinds (C# grammar)
pub const MEMBER_DECL_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "property_declaration",
    "field_declaration",
    "event_declaration",
    "event_field_declaration",
    "local_function_statement",
];

/// Nodes whose descendants are text, not code
pub const LITERAL_KINDS: &[&str] = &[
    "comment",
    "string_literal",
    "verbatim_string_literal",
    "raw_string_literal",
    "character_literal",
    "interpolated_string_expression",
    "interpolated_verbatim_string_expression",
];

/// Symbol-level metadata for one source file.
///
/// Every list is deduplicated in first-seen order with empty strings dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub namespace: String,
    pub class_names: Vec<String>,
    pub method_names: Vec<String>,
    pub base_types: Vec<String>,
    pub call_sites: Vec<String>,
    /// `ReturnType Name(ParamType, ...)`
    pub method_sigs: Vec<String>,
    pub type_refs: Vec<String>,
    /// Attribute names with a trailing `Attribute` removed
    pub attributes: Vec<String>,
    pub usings: Vec<String>,
}

impl SymbolRecord {
    pub fn is_empty(&self) -> bool {
        self == &SymbolRecord::default()
    }

    /// Apply first-seen dedup to every list
    pub fn normalized(self) -> Self {
        Self {
            namespace: self.namespace.trim().to_string(),
            class_names: dedupe(self.class_names),
            method_names: dedupe(self.method_names),
            base_types: dedupe(self.base_types),
            call_sites: dedupe(self.call_sites),
            method_sigs: dedupe(self.method_sigs),
            type_refs: dedupe(self.type_refs),
            attributes: dedupe(self.attributes),
            usings: dedupe(self.usings),
        }
    }
}

/// First-occurrence-order dedup that also drops empty strings
pub fn dedupe<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

/// `IFoo<T, U>` → `IFoo`
pub fn strip_generic(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => name[..idx].trim(),
        None => name.trim(),
    }
}

/// `ObsoleteAttribute` → `Obsolete`
pub fn normalize_attribute_name(name: &str) -> &str {
    name.strip_suffix("Attribute")
        .filter(|short| !short.is_empty())
        .unwrap_or(name)
}
