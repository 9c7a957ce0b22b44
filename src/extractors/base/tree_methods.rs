// Tree navigation helpers
//
// All traversals are iterative. Deeply nested generated code would otherwise
// be able to overflow the stack of a rayon worker.

use super::types::LITERAL_KINDS;
use tree_sitter::Node;

/// Every node under `root` (inclusive) matching `predicate`, in pre-order
pub fn find_all<'t, F>(root: Node<'t>, mut predicate: F) -> Vec<Node<'t>>
where
    F: FnMut(&Node<'t>) -> bool,
{
    let mut results = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if predicate(&node) {
            results.push(node);
        }
        // Reverse push keeps document order on pop
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    results
}

/// Nearest ancestor whose kind is in `kinds`
pub fn find_parent_of_types<'t>(node: &Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if kinds.contains(&parent.kind()) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Is the node inside a comment, string, or character literal?
pub fn in_literal(node: &Node) -> bool {
    find_parent_of_types(node, LITERAL_KINDS).is_some()
}

/// Find first direct child by kind
pub fn find_child_by_type<'t>(node: &Node<'t>, child_type: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == child_type);
    found
}

/// Find first direct child whose kind is any of `types`
pub fn find_child_by_types<'t>(node: &Node<'t>, types: &[&str]) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| types.contains(&c.kind()));
    found
}

pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}
