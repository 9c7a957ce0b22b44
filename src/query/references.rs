// Reference queries: calls, implements, uses, field_type, param_type, casts, ident
//
// Type comparisons are exact on the generic-stripped name of both sides, so
// `IFoo` and `IFoo<T>` match `IFoo<int>` but never `IFooBar`.

use super::declarations::type_header;
use super::{QueryHit, QuerySource};
use crate::extractors::base::{
    find_all, in_literal, strip_generic, truncate_chars, BaseExtractor, TYPE_DECL_KINDS,
};
use crate::extractors::csharp::helpers;
use std::collections::HashSet;
use tree_sitter::Node;

/// Longest call text printed before truncation
const MAX_CALL_TEXT: usize = 140;

/// Keep the first node per source line, rendering the trimmed line
fn line_deduped<'t>(src: &QuerySource, nodes: impl IntoIterator<Item = Node<'t>>) -> Vec<QueryHit> {
    let mut seen_rows = HashSet::new();
    nodes
        .into_iter()
        .filter(|n| seen_rows.insert(n.start_position().row))
        .map(|n| QueryHit::new(BaseExtractor::line_number(&n), src.line_text(&n)))
        .collect()
}

fn is_identifier_named(src: &QuerySource, node: &Node, name: &str) -> bool {
    node.kind() == "identifier" && src.base.get_node_text(node) == name
}

/// Declared type names `pattern` on its generic-stripped name
fn same_type(declared: &str, pattern: &str) -> bool {
    strip_generic(declared) == strip_generic(pattern)
}

/// Same node as `other`, compared by position
fn same_node(node: &Node, other: Option<Node>) -> bool {
    other.is_some_and(|o| o.id() == node.id())
}

pub fn calls(src: &QuerySource, root: Node, name: &str) -> Vec<QueryHit> {
    find_all(root, |n| n.kind() == "invocation_expression")
        .into_iter()
        .filter(|node| !in_literal(node))
        .filter(|node| helpers::callee_name(&src.base, node).as_deref() == Some(name))
        .map(|node| {
            let raw = src.base.get_node_text(&node).replace('\r', "").replace('\n', " ");
            QueryHit::new(
                BaseExtractor::line_number(&node),
                truncate_chars(&raw, MAX_CALL_TEXT),
            )
        })
        .collect()
}

pub fn implements(src: &QuerySource, root: Node, ty: &str) -> Vec<QueryHit> {
    find_all(root, |n| TYPE_DECL_KINDS.contains(&n.kind()))
        .into_iter()
        .filter(|node| {
            helpers::base_type_names(&src.base, node)
                .iter()
                .any(|b| same_type(b, ty))
        })
        .filter_map(|node| {
            type_header(src, &node).map(|text| QueryHit::new(BaseExtractor::line_number(&node), text))
        })
        .collect()
}

/// The identifier is the declared name of its parent (class, method, variable...)
fn is_declared_name(node: &Node) -> bool {
    node.parent()
        .is_some_and(|p| same_node(node, p.child_by_field_name("name")))
}

/// `Foo()`, `Foo<T>()` or the `Foo` in `x.Foo()`
fn is_invocation_target(node: &Node) -> bool {
    let Some(mut parent) = node.parent() else {
        return false;
    };
    let mut node = *node;
    if parent.kind() == "generic_name" {
        node = parent;
        let Some(outer) = parent.parent() else {
            return false;
        };
        parent = outer;
    }
    match parent.kind() {
        "invocation_expression" => same_node(&node, parent.child_by_field_name("function")),
        "member_access_expression" => same_node(&node, parent.child_by_field_name("name")),
        _ => false,
    }
}

pub fn uses(src: &QuerySource, root: Node, ty: &str) -> Vec<QueryHit> {
    let nodes = find_all(root, |n| is_identifier_named(src, n, ty))
        .into_iter()
        .filter(|n| !in_literal(n) && !is_declared_name(n) && !is_invocation_target(n));
    line_deduped(src, nodes)
}

fn enclosing_suffix(src: &QuerySource, node: &Node) -> String {
    match helpers::enclosing_type_name(&src.base, node) {
        Some(cls) => format!("  [in {}]", cls),
        None => String::new(),
    }
}

pub fn field_type(src: &QuerySource, root: Node, ty: &str) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for node in find_all(root, |n| {
        matches!(n.kind(), "field_declaration" | "property_declaration")
    }) {
        let Some(declared) = helpers::member_type(&src.base, &node) else {
            continue;
        };
        if !same_type(&declared, ty) {
            continue;
        }
        let line = BaseExtractor::line_number(&node);
        let suffix = enclosing_suffix(src, &node);
        if node.kind() == "field_declaration" {
            for (_, name) in helpers::declarator_names(&src.base, &node) {
                hits.push(QueryHit::new(
                    line,
                    format!("[field] {} {}{}", declared, name, suffix),
                ));
            }
        } else if let Some(name) = helpers::declaration_name(&src.base, &node) {
            hits.push(QueryHit::new(
                line,
                format!("[prop] {} {}{}", declared, name, suffix),
            ));
        }
    }
    hits
}

const PARAMETERIZED_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "local_function_statement",
    "delegate_declaration",
    "lambda_expression",
];

pub fn param_type(src: &QuerySource, root: Node, ty: &str) -> Vec<QueryHit> {
    let mut hits = Vec::new();
    for owner in find_all(root, |n| PARAMETERIZED_KINDS.contains(&n.kind())) {
        let Some(list) = helpers::parameter_list(&owner) else {
            continue;
        };
        let owner_name = if owner.kind() == "lambda_expression" {
            "<lambda>".to_string()
        } else {
            helpers::declaration_name(&src.base, &owner).unwrap_or_default()
        };
        let kind = helpers::kind_label(owner.kind());

        for param in helpers::parameters(&list) {
            let Some(declared) = helpers::parameter_type(&src.base, &param) else {
                continue;
            };
            if !same_type(&declared, ty) {
                continue;
            }
            let name = helpers::parameter_name(&src.base, &param).unwrap_or_default();
            let mut mods = helpers::parameter_modifiers(&src.base, &param).join(" ");
            if !mods.is_empty() {
                mods.push(' ');
            }
            hits.push(QueryHit::new(
                BaseExtractor::line_number(&param),
                format!("[{}] {}({}{} {})", kind, owner_name, mods, declared, name),
            ));
        }
    }
    hits
}

pub fn casts(src: &QuerySource, root: Node, ty: &str) -> Vec<QueryHit> {
    let nodes = find_all(root, |n| n.kind() == "cast_expression")
        .into_iter()
        .filter(|n| !in_literal(n))
        .filter(|n| {
            src.base
                .get_field_text(n, "type")
                .is_some_and(|t| same_type(&t, ty))
        });
    line_deduped(src, nodes)
}

pub fn ident(src: &QuerySource, root: Node, name: &str) -> Vec<QueryHit> {
    let nodes = find_all(root, |n| is_identifier_named(src, n, name))
        .into_iter()
        .filter(|n| !in_literal(n));
    line_deduped(src, nodes)
}

#[cfg(test)]
mod tests {
    use crate::query::{query_source, QueryHit, QueryMode};

    fn run(mode: QueryMode, src: &str) -> Vec<QueryHit> {
        query_source(&mode, src.as_bytes())
    }

    fn texts(mode: QueryMode, src: &str) -> Vec<String> {
        run(mode, src).into_iter().map(|h| h.text).collect()
    }

    #[test]
    fn test_implements_single_interface() {
        let hits = run(
            QueryMode::Implements("IBarService".into()),
            "class Foo : IBarService { }\nclass Other : IBarServiceExtra { }\n",
        );
        assert_eq!(hits, vec![QueryHit::new(1, "[class] Foo : IBarService")]);
    }

    #[test]
    fn test_implements_matches_generic_base() {
        let hits = texts(
            QueryMode::Implements("IFoo".into()),
            "class Foo : Base, IFoo<int> { }",
        );
        assert_eq!(hits, vec!["[class] Foo : Base, IFoo"]);
    }

    #[test]
    fn test_calls_folds_and_truncates() {
        let src = "class A {\n  void M() {\n    Save(1,\n      2);\n    repo.Save(3);\n    // Save(4);\n    Load();\n  }\n}\n";
        let hits = run(QueryMode::Calls("Save".into()), src);
        assert_eq!(
            hits,
            vec![
                QueryHit::new(3, "Save(1,       2)"),
                QueryHit::new(5, "repo.Save(3)"),
            ]
        );

        let long_arg = "x".repeat(200);
        let src = format!("class A {{ void M() {{ Run(\"{}\"); }} }}", long_arg);
        let hits = run(QueryMode::Calls("Run".into()), &src);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text.chars().count(), 141);
        assert!(hits[0].text.ends_with('…'));
    }

    #[test]
    fn test_calls_match_generic_callee() {
        let hits = texts(
            QueryMode::Calls("Resolve".into()),
            "class A { void M() { c.Resolve<IFoo>(); Resolve<int>(); } }",
        );
        assert_eq!(hits, vec!["c.Resolve<IFoo>()", "Resolve<int>()"]);
    }

    const STORE_SAMPLE: &str = r#"class MyStore
{
    public MyStore() { }
}

class Consumer
{
    private MyStore _store;
    public MyStore Current { get; set; }
    private MyStoreFactory _factory;
    private List<MyStore> _all;

    public Consumer(MyStore store, int n) { _store = store; }

    public void Use(ref MyStore other, string note)
    {
        // MyStore in a comment
        var s = "MyStore";
        var copy = (MyStore)other;
        MyStore();
        helper.MyStore();
    }
}
"#;

    #[test]
    fn test_field_type_exact_match() {
        let hits = run(QueryMode::FieldType("MyStore".into()), STORE_SAMPLE);
        assert_eq!(
            hits,
            vec![
                QueryHit::new(8, "[field] MyStore _store  [in Consumer]"),
                QueryHit::new(9, "[prop] MyStore Current  [in Consumer]"),
            ]
        );
    }

    #[test]
    fn test_param_type_ctor_and_method() {
        let hits = run(QueryMode::ParamType("MyStore".into()), STORE_SAMPLE);
        assert_eq!(
            hits,
            vec![
                QueryHit::new(13, "[constructor] Consumer(MyStore store)"),
                QueryHit::new(15, "[method] Use(ref MyStore other)"),
            ]
        );
    }

    #[test]
    fn test_param_type_in_lambda() {
        let hits = texts(
            QueryMode::ParamType("Item".into()),
            "class A { void M() { Func<Item, int> f = (Item i) => 1; } }",
        );
        assert_eq!(hits, vec!["[lambda expression] <lambda>(Item i)"]);
    }

    #[test]
    fn test_uses_skips_declarations_invocations_and_literals() {
        let hits = run(QueryMode::Uses("MyStore".into()), STORE_SAMPLE);
        let lines: Vec<usize> = hits.iter().map(|h| h.line).collect();
        // 1 and 3 declare MyStore, 17/18 are comment/string, 20/21 are call targets
        assert_eq!(lines, vec![8, 9, 11, 13, 15, 19]);
        assert_eq!(hits[0].text, "private MyStore _store;");
    }

    #[test]
    fn test_casts_line_deduped() {
        let hits = run(
            QueryMode::Casts("Foo".into()),
            "class A { void M(object o) { var a = (Foo)o; var b = (Foo)o; var c = (Bar)o; } }",
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 1);

        let hits = run(QueryMode::Casts("Foo".into()), STORE_SAMPLE);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_ident_everywhere_but_literals() {
        let hits = run(QueryMode::Ident("MyStore".into()), STORE_SAMPLE);
        let lines: Vec<usize> = hits.iter().map(|h| h.line).collect();
        assert_eq!(lines, vec![1, 3, 8, 9, 11, 13, 15, 19, 20, 21]);
    }

    #[test]
    fn test_generic_patterns_match_on_bare_name() {
        let src = "class A : IFoo<int>\n{\n    List<int> _xs;\n    void M(List<int> p, object o)\n    {\n        var y = (List<int>)o;\n    }\n}\n";
        assert_eq!(
            texts(QueryMode::Implements("IFoo<T>".into()), src),
            vec!["[class] A : IFoo"]
        );
        assert_eq!(
            texts(QueryMode::FieldType("List<int>".into()), src),
            vec!["[field] List<int> _xs  [in A]"]
        );
        assert_eq!(
            texts(QueryMode::ParamType("List<string>".into()), src),
            vec!["[method] M(List<int> p)"]
        );
        let casts = run(QueryMode::Casts("List<int>".into()), src);
        assert_eq!(casts.len(), 1);
        assert_eq!(casts[0].line, 6);
    }

    #[test]
    fn test_uses_skips_generic_invocation_target() {
        let src = "class A\n{\n    void M()\n    {\n        Make<int>();\n        var m = Make;\n    }\n}\n";
        let lines: Vec<usize> = run(QueryMode::Uses("Make".into()), src)
            .iter()
            .map(|h| h.line)
            .collect();
        assert_eq!(lines, vec![6]);
    }

    #[test]
    fn test_interpolated_strings_are_literals() {
        let src = "class A\n{\n    string M(Widget w)\n    {\n        return $\"{Widget} and {w}\";\n    }\n}\n";
        let ident: Vec<usize> = run(QueryMode::Ident("Widget".into()), src)
            .iter()
            .map(|h| h.line)
            .collect();
        assert_eq!(ident, vec![3]);
        let uses: Vec<usize> = run(QueryMode::Uses("Widget".into()), src)
            .iter()
            .map(|h| h.line)
            .collect();
        assert_eq!(uses, vec![3]);
    }
}
