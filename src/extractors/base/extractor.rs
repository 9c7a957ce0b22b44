// BaseExtractor implementation
//
// Borrowed view over the source bytes a tree was parsed from. Extractors and
// query functions read node text and positions through it.

use tree_sitter::Node;

/// Text and position access for one parsed source buffer
#[derive(Debug, Clone, Copy)]
pub struct BaseExtractor<'a> {
    pub source: &'a [u8],
}

impl<'a> BaseExtractor<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self { source }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Lossy decode: files in the wild are not always valid UTF-8
        if start_byte <= end_byte && end_byte <= self.source.len() {
            String::from_utf8_lossy(&self.source[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Node text with surrounding whitespace trimmed
    pub fn get_trimmed_text(&self, node: &Node) -> String {
        self.get_node_text(node).trim().to_string()
    }

    /// Get field text safely
    pub fn get_field_text(&self, node: &Node, field_name: &str) -> Option<String> {
        node.child_by_field_name(field_name)
            .map(|field_node| self.get_trimmed_text(&field_node))
    }

    /// Text of the first field present among `field_names`.
    ///
    /// Grammar releases disagree on some field names (`returns` vs `type`).
    pub fn get_first_field_text(&self, node: &Node, field_names: &[&str]) -> Option<String> {
        field_names
            .iter()
            .find_map(|field| node.child_by_field_name(field))
            .map(|n| self.get_trimmed_text(&n))
    }

    /// 1-based line of the node's first byte
    pub fn line_number(node: &Node) -> usize {
        node.start_position().row + 1
    }

    /// 1-based inclusive line span of the node
    pub fn line_range(node: &Node) -> (usize, usize) {
        (node.start_position().row + 1, node.end_position().row + 1)
    }
}

/// Truncate to `max_chars` characters, appending `…` when something was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::parse_csharp;

    #[test]
    fn node_text_and_lines() {
        let src = b"class A\n{\n    int x;\n}\n";
        let tree = parse_csharp(src).unwrap();
        let base = BaseExtractor::new(src);
        let class = tree.root_node().named_child(0).unwrap();

        assert_eq!(class.kind(), "class_declaration");
        assert_eq!(base.get_field_text(&class, "name").as_deref(), Some("A"));
        assert_eq!(BaseExtractor::line_range(&class), (1, 4));
        assert_eq!(BaseExtractor::line_number(&class), 1);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let src: &[u8] = b"class \xff\xfe { }";
        let tree = parse_csharp(src).unwrap();
        let base = BaseExtractor::new(src);
        let text = base.get_node_text(&tree.root_node());
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
        assert_eq!(truncate_chars("ééé", 2), "éé…");
    }
}
