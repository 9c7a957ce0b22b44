// C# Member Declaration Extraction

use super::helpers;
use crate::extractors::base::{BaseExtractor, SymbolRecord};
use tree_sitter::Node;

/// Methods and local functions: name, type-only signature, and (for methods)
/// the return and parameter types as type references
pub fn extract_method(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    let Some(name) = helpers::declaration_name(base, &node) else {
        return;
    };
    record.method_names.push(name);

    if let Some(sig) = helpers::signature(base, &node, false) {
        record.method_sigs.push(sig);
    }

    if node.kind() == "method_declaration" {
        if let Some(ret) = helpers::return_type(base, &node) {
            record.type_refs.push(ret);
        }
        if let Some(list) = helpers::parameter_list(&node) {
            for param in helpers::parameters(&list) {
                if let Some(ty) = helpers::parameter_type(base, &param) {
                    record.type_refs.push(ty);
                }
            }
        }
    }
}

pub fn extract_constructor(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if let Some(name) = helpers::declaration_name(base, &node) {
        record.method_names.push(name);
    }
}

/// Properties and events with accessors
pub fn extract_property(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if let Some(name) = helpers::declaration_name(base, &node) {
        record.method_names.push(name);
    }
    if let Some(ty) = helpers::member_type(base, &node) {
        record.type_refs.push(ty);
    }
}

/// Fields and field-like events: one name per declared variable
pub fn extract_field(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    for (_, name) in helpers::declarator_names(base, &node) {
        record.method_names.push(name);
    }
    if let Some(ty) = helpers::member_type(base, &node) {
        record.type_refs.push(ty);
    }
}
