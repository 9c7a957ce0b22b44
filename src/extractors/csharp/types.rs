// C# Type Declaration Extraction
//
// Namespaces, using directives, attributes and type declarations.

use super::helpers;
use crate::extractors::base::{normalize_attribute_name, BaseExtractor, SymbolRecord};
use tree_sitter::Node;

/// First namespace wins
pub fn extract_namespace(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if !record.namespace.is_empty() {
        return;
    }
    let name = base.get_field_text(&node, "name").or_else(|| {
        crate::extractors::base::find_child_by_types(&node, &["qualified_name", "identifier"])
            .map(|n| base.get_trimmed_text(&n))
    });
    if let Some(name) = name {
        record.namespace = name;
    }
}

pub fn extract_using(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if let Some(target) = helpers::using_target(base, &node) {
        record.usings.push(target);
    }
}

/// `[Obsolete]`, `[ObsoleteAttribute]` and `[System.Obsolete]` all record `Obsolete`
pub fn extract_attribute(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    let Some(name) = base.get_field_text(&node, "name") else {
        return;
    };
    let short = name.rsplit('.').next().unwrap_or(&name);
    record
        .attributes
        .push(normalize_attribute_name(short).to_string());
}

/// Type name plus its base list
pub fn extract_type(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if let Some(name) = helpers::declaration_name(base, &node) {
        record.class_names.push(name);
    }
    record
        .base_types
        .extend(helpers::base_type_names(base, &node));
}
