//! Search front-end: mode → store parameters, response model and rendering.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Fields highlighted in full rather than snippeted
const HIGHLIGHT_FULL_FIELDS: &str = "symbols,class_names,method_names,filename,base_types,method_sigs";

/// Highlight fields worth printing as a match snippet
const SNIPPET_FIELDS: &[&str] = &[
    "content",
    "method_sigs",
    "base_types",
    "call_sites",
    "type_refs",
    "attributes",
];

/// Which document fields a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Filenames, symbols and content
    #[default]
    Text,
    /// Type and member names only
    Symbols,
    /// Types inheriting from or implementing the query
    Implements,
    /// Files calling the queried method
    Callers,
    /// Method signatures
    Sig,
    /// Files referencing the queried type in declarations
    Uses,
    /// Files decorated with the queried attribute
    Attr,
}

impl SearchMode {
    pub fn query_by(&self) -> &'static str {
        match self {
            SearchMode::Text => "filename,symbols,class_names,method_names,content",
            SearchMode::Symbols => "symbols,class_names,method_names,filename",
            SearchMode::Implements => "base_types,class_names,filename",
            SearchMode::Callers => "call_sites,filename",
            SearchMode::Sig => "method_sigs,method_names,filename",
            SearchMode::Uses => "type_refs,symbols,class_names,filename",
            SearchMode::Attr => "attributes,filename",
        }
    }
}

/// One search against the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    /// Extension filter, with or without the dot
    pub extension: Option<String>,
    pub subsystem: Option<String>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::Text,
            extension: None,
            subsystem: None,
            limit: 10,
        }
    }

    pub fn filter_by(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(ext) = self.extension.as_deref().filter(|e| !e.is_empty()) {
            parts.push(format!("extension:={}", ext.trim_start_matches('.')));
        }
        if let Some(sub) = self.subsystem.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("subsystem:={}", sub));
        }
        (!parts.is_empty()).then(|| parts.join(" && "))
    }

    /// Query-string parameters for the store's search endpoint
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("q".into(), self.query.clone()),
            ("query_by".into(), self.mode.query_by().into()),
            ("per_page".into(), self.limit.to_string()),
            ("highlight_full_fields".into(), HIGHLIGHT_FULL_FIELDS.into()),
            ("snippet_threshold".into(), "30".into()),
            ("num_typos".into(), "1".into()),
            ("prefix".into(), "false".into()),
            ("facet_by".into(), "subsystem,extension".into()),
        ];
        if let Some(filter) = self.filter_by() {
            params.push(("filter_by".into(), filter));
        }
        // Without an extension filter, rank C# above everything else
        if !matches!(self.extension.as_deref(), Some(e) if !e.is_empty()) {
            params.push(("sort_by".into(), "_text_match:desc,priority:desc".into()));
        }
        params
    }
}

/// Stored document as returned in a hit. Every field is optional because
/// older collections may predate some of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitDocument {
    pub id: String,
    pub path: String,
    pub relative_path: String,
    pub filename: String,
    pub extension: String,
    pub subsystem: String,
    pub namespace: String,
    pub class_names: Vec<String>,
    pub method_names: Vec<String>,
    pub base_types: Vec<String>,
    pub method_sigs: Vec<String>,
    pub attributes: Vec<String>,
    pub usings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlight {
    pub field: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub document: HitDocument,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetValue {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetCount {
    pub field_name: String,
    pub counts: Vec<FacetValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub found: u64,
    pub hits: Vec<SearchHit>,
    pub facet_counts: Vec<FacetCount>,
}

fn first_n(items: &[String], n: usize, sep: &str) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(sep)
}

/// Human-readable rendering of a search response
pub fn format_results(
    response: &SearchResponse,
    request: &SearchRequest,
    show_facets: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Search: \"{}\" ({} results) [fields: {}] ===\n",
        request.query,
        response.found,
        request.mode.query_by()
    );

    if show_facets || (response.found > 0 && response.hits.is_empty()) {
        for facet in &response.facet_counts {
            if facet.counts.is_empty() {
                continue;
            }
            let parts: Vec<String> = facet
                .counts
                .iter()
                .take(15)
                .map(|c| format!("{}({})", c.value, c.count))
                .collect();
            let _ = writeln!(out, "  [{}] {}", facet.field_name, parts.join(", "));
        }
        out.push('\n');
    }

    if response.hits.is_empty() {
        out.push_str("No results found.\n");
        return out;
    }

    for (i, hit) in response.hits.iter().enumerate() {
        let doc = &hit.document;
        let _ = writeln!(out, "{}. {}", i + 1, doc.relative_path);

        if !doc.class_names.is_empty() {
            let _ = writeln!(out, "   Classes    : {}", first_n(&doc.class_names, 5, ", "));
        }
        if !doc.base_types.is_empty() {
            let _ = writeln!(out, "   Implements : {}", first_n(&doc.base_types, 5, ", "));
        }
        if !doc.method_sigs.is_empty() {
            let _ = writeln!(out, "   Signatures : {}", first_n(&doc.method_sigs, 3, "; "));
        } else if !doc.method_names.is_empty() {
            let _ = writeln!(out, "   Members    : {}", first_n(&doc.method_names, 6, ", "));
        }
        if !doc.attributes.is_empty() {
            let _ = writeln!(out, "   Attributes : {}", first_n(&doc.attributes, 5, ", "));
        }
        if !doc.usings.is_empty() {
            let _ = writeln!(out, "   Usings     : {}", first_n(&doc.usings, 4, ", "));
        }
        if !doc.namespace.is_empty() {
            let _ = writeln!(out, "   NS         : {}", doc.namespace);
        }

        let snippet = hit
            .highlights
            .iter()
            .find(|h| SNIPPET_FIELDS.contains(&h.field.as_str()))
            .map(|h| h.snippet.replace('\n', " ").trim().to_string());
        if let Some(snippet) = snippet.filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "   Match      : ...{}...", snippet);
        }
        out.push('\n');
    }
    out
}
