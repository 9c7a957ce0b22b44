// C# Helper Methods
//
// Node-level accessors shared by the extractor and the structural queries.
// tree-sitter-c-sharp has renamed a few fields across releases, so accessors
// try every known field name before falling back to child kinds.

use crate::extractors::base::{
    find_child_by_type, find_child_by_types, named_children, strip_generic, BaseExtractor,
};
use tree_sitter::Node;

/// Field names a method's return type has lived under
const RETURN_TYPE_FIELDS: &[&str] = &["returns", "type"];

/// Parameter modifier keywords
const PARAMETER_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this", "scoped", "readonly"];

/// `class_declaration` → `class`, `record_struct_declaration` → `record struct`
pub fn kind_label(kind: &str) -> String {
    kind.trim_end_matches("_declaration")
        .trim_end_matches("_statement")
        .replace('_', " ")
}

/// Declared name of a type or member (not fields, which declare per variable)
pub fn declaration_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    if let Some(name) = base.get_field_text(node, "name") {
        return Some(name);
    }
    find_child_by_type(node, "identifier").map(|n| base.get_trimmed_text(&n))
}

/// Names from the base list of a type declaration.
///
/// Generic arguments are dropped (`IFoo<int>` → `IFoo`,
/// `System.IEquatable<A>` → `System.IEquatable`); qualifiers are kept. Declarations without a base list yield nothing.
pub fn base_type_names(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let Some(base_list) = find_child_by_type(node, "base_list") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for child in named_children(&base_list) {
        let name = match child.kind() {
            "identifier" | "qualified_name" => {
                Some(strip_generic(&base.get_node_text(&child)).to_string())
            }
            "generic_name" => generic_identifier(base, &child),
            // Older grammar releases wrapped every entry
            "simple_base_type" | "primary_constructor_base_type" => child
                .child_by_field_name("type")
                .or_else(|| child.child_by_field_name("name"))
                .or_else(|| child.named_child(0))
                .map(|t| match t.kind() {
                    "generic_name" => generic_identifier(base, &t).unwrap_or_default(),
                    _ => strip_generic(&base.get_node_text(&t)).to_string(),
                }),
            _ => None,
        };
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            names.push(name);
        }
    }
    names
}

/// Bare identifier of a `generic_name` node
pub fn generic_identifier(base: &BaseExtractor, node: &Node) -> Option<String> {
    find_child_by_type(node, "identifier")
        .map(|n| base.get_trimmed_text(&n))
        .or_else(|| Some(strip_generic(&base.get_node_text(node)).to_string()))
}

/// Return type of a method, local function or delegate
pub fn return_type(base: &BaseExtractor, node: &Node) -> Option<String> {
    base.get_first_field_text(node, RETURN_TYPE_FIELDS)
}

/// Declared type of a field, event field, property or event declaration
pub fn member_type(base: &BaseExtractor, node: &Node) -> Option<String> {
    match node.kind() {
        "field_declaration" | "event_field_declaration" => {
            let var_decl = find_child_by_type(node, "variable_declaration")?;
            base.get_field_text(&var_decl, "type")
        }
        _ => base.get_field_text(node, "type"),
    }
}

/// `(name node, name)` for every variable declared by a field or event field
pub fn declarator_names<'t>(base: &BaseExtractor, node: &Node<'t>) -> Vec<(Node<'t>, String)> {
    let Some(var_decl) = find_child_by_type(node, "variable_declaration") else {
        return Vec::new();
    };
    named_children(&var_decl)
        .into_iter()
        .filter(|c| c.kind() == "variable_declarator")
        .filter_map(|declarator| {
            let name_node = declarator
                .child_by_field_name("name")
                .or_else(|| find_child_by_type(&declarator, "identifier"))?;
            Some((name_node, base.get_trimmed_text(&name_node)))
        })
        .collect()
}

/// Parameter list node of a method-like declaration
pub fn parameter_list<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("parameters")
        .or_else(|| find_child_by_types(node, &["parameter_list", "bracketed_parameter_list"]))
}

/// Direct `parameter` children of a parameter list
pub fn parameters<'t>(params: &Node<'t>) -> Vec<Node<'t>> {
    named_children(params)
        .into_iter()
        .filter(|c| c.kind() == "parameter")
        .collect()
}

/// Declared parameter type, skipping modifier tokens some grammar releases
/// tag with the same field
pub fn parameter_type(base: &BaseExtractor, param: &Node) -> Option<String> {
    let mut cursor = param.walk();
    let found = param
        .children_by_field_name("type", &mut cursor)
        .find(|t| {
            !matches!(t.kind(), "modifier" | "parameter_modifier")
                && !PARAMETER_MODIFIERS.contains(&t.kind())
        })
        .map(|t| base.get_trimmed_text(&t));
    found
}

pub fn parameter_name(base: &BaseExtractor, param: &Node) -> Option<String> {
    base.get_field_text(param, "name")
        .or_else(|| find_child_by_type(param, "identifier").map(|n| base.get_trimmed_text(&n)))
}

/// `ref`, `out`, `in`, `params`, `this` ... in source order
pub fn parameter_modifiers(base: &BaseExtractor, param: &Node) -> Vec<String> {
    let mut cursor = param.walk();
    let mut modifiers = Vec::new();
    for child in param.children(&mut cursor) {
        match child.kind() {
            "modifier" | "parameter_modifier" => modifiers.push(base.get_trimmed_text(&child)),
            kind if !child.is_named() && PARAMETER_MODIFIERS.contains(&kind) => {
                modifiers.push(kind.to_string())
            }
            _ => {}
        }
    }
    modifiers
}

/// Default value text (`= 5` → `5`).
///
/// Current grammar releases put the value expression straight after the `=`
/// token; older ones wrapped it in an `equals_value_clause`.
pub fn parameter_default(base: &BaseExtractor, param: &Node) -> Option<String> {
    if let Some(default) = param.child_by_field_name("default") {
        return Some(equals_value_text(base, &default));
    }
    if let Some(clause) = find_child_by_type(param, "equals_value_clause") {
        return Some(equals_value_text(base, &clause));
    }
    let mut cursor = param.walk();
    let mut after_equals = false;
    for child in param.children(&mut cursor) {
        if after_equals && child.is_named() {
            return Some(base.get_trimmed_text(&child));
        }
        if !child.is_named() && child.kind() == "=" {
            after_equals = true;
        }
    }
    None
}

fn equals_value_text(base: &BaseExtractor, node: &Node) -> String {
    if node.kind() == "equals_value_clause" {
        if let Some(value) = node.named_child(node.named_child_count().saturating_sub(1)) {
            return base.get_trimmed_text(&value);
        }
    }
    base.get_trimmed_text(node)
        .trim_start_matches('=')
        .trim()
        .to_string()
}

/// `Ret Name(T1, T2)` when `with_names` is false, `Ret Name(T1 a, T2 b)` otherwise
pub fn signature(base: &BaseExtractor, node: &Node, with_names: bool) -> Option<String> {
    let name = declaration_name(base, node)?;
    let params: Vec<String> = parameter_list(node)
        .map(|list| {
            parameters(&list)
                .iter()
                .filter_map(|p| {
                    let ty = parameter_type(base, p).unwrap_or_default();
                    let text = if with_names {
                        let pname = parameter_name(base, p).unwrap_or_default();
                        format!("{} {}", ty, pname).trim().to_string()
                    } else {
                        ty
                    };
                    (!text.is_empty()).then_some(text)
                })
                .collect()
        })
        .unwrap_or_default();

    let call = format!("{}({})", name, params.join(", "));
    Some(match return_type(base, node) {
        Some(ret) if !ret.is_empty() && node.kind() != "constructor_declaration" => {
            format!("{} {}", ret, call)
        }
        _ => call,
    })
}

/// Namespace named by a using directive; the target for `using X = A.B;`
pub fn using_target(base: &BaseExtractor, node: &Node) -> Option<String> {
    named_children(node)
        .into_iter()
        .rev()
        .find(|c| {
            matches!(
                c.kind(),
                "qualified_name" | "identifier" | "generic_name" | "alias_qualified_name"
            )
        })
        .map(|n| base.get_trimmed_text(&n))
}

/// Callee name of an invocation: the accessed member for `a.B()`, the
/// identifier for `B()` / `B<T>()`. Generic arguments are stripped.
pub fn callee_name(base: &BaseExtractor, invocation: &Node) -> Option<String> {
    let function = invocation
        .child_by_field_name("function")
        .or_else(|| invocation.named_child(0))?;
    let target = match function.kind() {
        "member_access_expression" | "member_binding_expression" => {
            function.child_by_field_name("name")?
        }
        "identifier" | "generic_name" => function,
        // a?.B()
        "conditional_access_expression" => named_children(&function)
            .into_iter()
            .rev()
            .find(|c| c.kind() == "member_binding_expression")?
            .child_by_field_name("name")?,
        _ => return None,
    };
    let name = match target.kind() {
        "generic_name" => generic_identifier(base, &target)?,
        _ => strip_generic(&base.get_node_text(&target)).to_string(),
    };
    (!name.is_empty()).then_some(name)
}

/// Name of the innermost enclosing type declaration
pub fn enclosing_type_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    let ty = crate::extractors::base::find_parent_of_types(
        node,
        crate::extractors::base::TYPE_DECL_KINDS,
    )?;
    declaration_name(base, &ty)
}
