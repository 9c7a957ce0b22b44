// Base Extractor Types for codesearch
//
// Shared plumbing for the C# extractor and the structural query engine:
// - types.rs: SymbolRecord, declaration kind tables, name normalization
// - extractor.rs: BaseExtractor (node text and positions over source bytes)
// - tree_methods.rs: Tree navigation and traversal helpers

pub mod extractor;
pub mod tree_methods;
pub mod types;

// Re-export key types for external use
pub use extractor::{truncate_chars, BaseExtractor};
pub use tree_methods::{
    find_all, find_child_by_type, find_child_by_types, find_parent_of_types, in_literal,
    named_children,
};
pub use types::{
    dedupe, normalize_attribute_name, strip_generic, SymbolRecord, LITERAL_KINDS,
    MEMBER_DECL_KINDS, TYPE_DECL_KINDS,
};
