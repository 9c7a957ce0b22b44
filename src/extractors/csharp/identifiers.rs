// C# Call Site Extraction

use super::helpers;
use crate::extractors::base::{BaseExtractor, SymbolRecord};
use tree_sitter::Node;

/// Record the callee name of an invocation (target name only)
pub fn extract_call_site(base: &BaseExtractor, node: Node, record: &mut SymbolRecord) {
    if let Some(name) = helpers::callee_name(base, &node) {
        record.call_sites.push(name);
    }
}
