// Declaration listings: classes, methods, fields, usings, attrs, find, params

use super::{QueryHit, QuerySource};
use crate::extractors::base::{
    find_all, find_child_by_type, normalize_attribute_name, BaseExtractor, MEMBER_DECL_KINDS,
    TYPE_DECL_KINDS,
};
use crate::extractors::csharp::helpers;
use tree_sitter::Node;

/// `[kind] Name : Base1, Base2`
pub(super) fn type_header(src: &QuerySource, node: &Node) -> Option<String> {
    let name = helpers::declaration_name(&src.base, node)?;
    let bases = helpers::base_type_names(&src.base, node);
    let kind = helpers::kind_label(node.kind());
    Some(if bases.is_empty() {
        format!("[{}] {}", kind, name)
    } else {
        format!("[{}] {} : {}", kind, name, bases.join(", "))
    })
}

pub fn classes(src: &QuerySource, root: Node) -> Vec<QueryHit> {
    find_all(root, |n| TYPE_DECL_KINDS.contains(&n.kind()))
        .iter()
        .filter_map(|node| {
            type_header(src, node).map(|text| QueryHit::new(BaseExtractor::line_number(node), text))
        })
        .collect()
}

/// One `[tag] Type name` hit per declared variable
fn variable_hits(src: &QuerySource, node: &Node, tag: &str) -> Vec<QueryHit> {
    let ty = helpers::member_type(&src.base, node).unwrap_or_default();
    let line = BaseExtractor::line_number(node);
    helpers::declarator_names(&src.base, node)
        .into_iter()
        .map(|(_, name)| QueryHit::new(line, format!("[{}] {} {}", tag, ty, name)))
        .collect()
}

fn typed_member_hit(src: &QuerySource, node: &Node, tag: &str) -> Option<QueryHit> {
    let name = helpers::declaration_name(&src.base, node)?;
    let ty = helpers::member_type(&src.base, node).unwrap_or_default();
    Some(QueryHit::new(
        BaseExtractor::line_number(node),
        format!("[{}] {} {}", tag, ty, name),
    ))
}

pub fn methods(src: &QuerySource, root: Node) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| MEMBER_DECL_KINDS.contains(&n.kind())) {
        let line = BaseExtractor::line_number(&node);
        match node.kind() {
            "field_declaration" => hits.extend(variable_hits(src, &node, "field")),
            "event_field_declaration" => hits.extend(variable_hits(src, &node, "event")),
            "property_declaration" => hits.extend(typed_member_hit(src, &node, "prop")),
            "event_declaration" => hits.extend(typed_member_hit(src, &node, "event")),
            "constructor_declaration" => {
                if let Some(sig) = helpers::signature(&src.base, &node, true) {
                    hits.push(QueryHit::new(line, format!("[ctor] {}", sig)));
                }
            }
            _ => {
                if let Some(sig) = helpers::signature(&src.base, &node, true) {
                    hits.push(QueryHit::new(line, format!("[method] {}", sig)));
                }
            }
        }
    }
    hits
}

pub fn fields(src: &QuerySource, root: Node) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| {
        matches!(n.kind(), "field_declaration" | "property_declaration")
    }) {
        if node.kind() == "field_declaration" {
            hits.extend(variable_hits(src, &node, "field"));
        } else {
            hits.extend(typed_member_hit(src, &node, "prop"));
        }
    }
    hits
}

pub fn usings(src: &QuerySource, root: Node) -> Vec<QueryHit> {
    find_all(root, |n| n.kind() == "using_directive")
        .iter()
        .map(|node| {
            let text = src.base.get_trimmed_text(node);
            let text = text.trim_end_matches(';').trim_end().to_string();
            QueryHit::new(BaseExtractor::line_number(node), text)
        })
        .collect()
}

/// `[Name](args)`. The filter matches the written name or the name without
/// its `Attribute` suffix.
pub fn attrs(src: &QuerySource, root: Node, filter: Option<&str>) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| n.kind() == "attribute") {
        let Some(raw) = src.base.get_field_text(&node, "name") else {
            continue;
        };
        if let Some(wanted) = filter {
            if raw != wanted && normalize_attribute_name(&raw) != wanted {
                continue;
            }
        }
        let args = node
            .child_by_field_name("arguments")
            .or_else(|| find_child_by_type(&node, "attribute_argument_list"))
            .map(|a| src.base.get_trimmed_text(&a))
            .unwrap_or_default();
        hits.push(QueryHit::new(
            BaseExtractor::line_number(&node),
            format!("[{}]{}", raw, args),
        ));
    }
    hits
}

/// Header line plus the full source span of every declaration named `name`
pub fn find(src: &QuerySource, root: Node, name: &str) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| {
        TYPE_DECL_KINDS.contains(&n.kind()) || MEMBER_DECL_KINDS.contains(&n.kind())
    }) {
        let declared: Vec<String> = match node.kind() {
            "field_declaration" | "event_field_declaration" => {
                helpers::declarator_names(&src.base, &node)
                    .into_iter()
                    .map(|(_, n)| n)
                    .collect()
            }
            _ => helpers::declaration_name(&src.base, &node).into_iter().collect(),
        };
        if !declared.iter().any(|d| d == name) {
            continue;
        }

        let (start, end) = BaseExtractor::line_range(&node);
        let mut text = format!(
            "[{}] {} (lines {}-{})",
            helpers::kind_label(node.kind()),
            name,
            start,
            end
        );
        for line in src.lines.iter().take(end).skip(start - 1) {
            text.push('\n');
            text.push_str(line);
        }
        hits.push(QueryHit::new(start, text));
    }
    hits
}

/// One line per parameter: `  {mods }{type} {name}{ = default}`
pub fn params(src: &QuerySource, root: Node, method: &str) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| {
        matches!(
            n.kind(),
            "method_declaration" | "constructor_declaration" | "local_function_statement"
        )
    }) {
        if helpers::declaration_name(&src.base, &node).as_deref() != Some(method) {
            continue;
        }
        let lines: Vec<String> = helpers::parameter_list(&node)
            .map(|list| {
                helpers::parameters(&list)
                    .iter()
                    .map(|p| parameter_line(&src.base, p))
                    .collect()
            })
            .unwrap_or_default();

        let text = if lines.is_empty() {
            "(no parameters)".to_string()
        } else {
            lines.join("\n")
        };
        hits.push(QueryHit::new(BaseExtractor::line_number(&node), text));
    }
    hits
}

fn parameter_line(base: &BaseExtractor, param: &Node) -> String {
    let mods = helpers::parameter_modifiers(base, param);
    let ty = helpers::parameter_type(base, param).unwrap_or_default();
    let name = helpers::parameter_name(base, param).unwrap_or_default();
    let mut line = String::from("  ");
    if !mods.is_empty() {
        line.push_str(&mods.join(" "));
        line.push(' ');
    }
    line.push_str(&format!("{} {}", ty, name));
    if let Some(default) = helpers::parameter_default(base, param) {
        line.push_str(&format!(" = {}", default));
    }
    line.trim_end().to_string()
}
