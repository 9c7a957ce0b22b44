// C# Language Extractor
//
// One pre-order pass over a compilation unit producing a SymbolRecord:
// - Namespace (first block or file-scoped declaration) and using directives
// - Type declarations with their base lists
// - Member names, method signatures and declared type references
// - Attribute applications and invocation call sites

pub mod helpers;
mod identifiers;
mod members;
mod types;

use crate::extractors::base::{BaseExtractor, SymbolRecord};
use tree_sitter::{Node, Tree};

/// C# extractor using tree-sitter-c-sharp parser
pub struct CSharpExtractor<'a> {
    base: BaseExtractor<'a>,
    record: SymbolRecord,
}

impl<'a> CSharpExtractor<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            base: BaseExtractor::new(source),
            record: SymbolRecord::default(),
        }
    }

    /// Extract the symbol record for the whole tree
    pub fn extract(mut self, tree: &Tree) -> SymbolRecord {
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            self.visit(node);
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
        self.record.normalized()
    }

    fn visit(&mut self, node: Node) {
        let base = &self.base;
        let record = &mut self.record;
        match node.kind() {
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                types::extract_namespace(base, node, record)
            }
            "using_directive" => types::extract_using(base, node, record),
            "attribute" => types::extract_attribute(base, node, record),
            "class_declaration"
            | "interface_declaration"
            | "struct_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "delegate_declaration" => types::extract_type(base, node, record),
            "method_declaration" | "local_function_statement" => {
                members::extract_method(base, node, record)
            }
            "constructor_declaration" => members::extract_constructor(base, node, record),
            "property_declaration" | "event_declaration" => {
                members::extract_property(base, node, record)
            }
            "field_declaration" | "event_field_declaration" => {
                members::extract_field(base, node, record)
            }
            "invocation_expression" => identifiers::extract_call_site(base, node, record),
            _ => {}
        }
    }
}
