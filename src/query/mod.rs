//! Structural queries over C# syntax trees.
//!
//! Every mode is a pure function of the source bytes, the parsed tree and
//! the source lines. Nothing is cached between calls, so files can be queried
//! in parallel without coordination.

mod declarations;
pub mod files;
pub mod output;
mod references;

use crate::error::{CodeSearchError, Result};
use crate::extractors::base::BaseExtractor;
use crate::language::parse_csharp;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tree_sitter::{Node, Tree};

/// What to look for. The pattern argument, where one exists, lives on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Every type declaration
    Classes,
    /// Methods, constructors, properties, fields, events, local functions
    Methods,
    /// Fields and properties
    Fields,
    /// Invocations of a method name
    Calls(String),
    /// Types whose base list names the type
    Implements(String),
    /// Type references, excluding declarations and invocation targets
    Uses(String),
    /// Fields and properties declared with exactly the type
    FieldType(String),
    /// Parameters declared with exactly the type
    ParamType(String),
    /// Explicit casts to the type
    Casts(String),
    /// Any identifier occurrence outside comments and strings
    Ident(String),
    /// Attribute applications, optionally filtered by name
    Attrs(Option<String>),
    Usings,
    /// Full source of types and members with the name
    Find(String),
    /// Parameter list of the named methods
    Params(String),
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMode::Classes => "classes",
            QueryMode::Methods => "methods",
            QueryMode::Fields => "fields",
            QueryMode::Calls(_) => "calls",
            QueryMode::Implements(_) => "implements",
            QueryMode::Uses(_) => "uses",
            QueryMode::FieldType(_) => "field_type",
            QueryMode::ParamType(_) => "param_type",
            QueryMode::Casts(_) => "casts",
            QueryMode::Ident(_) => "ident",
            QueryMode::Attrs(_) => "attrs",
            QueryMode::Usings => "usings",
            QueryMode::Find(_) => "find",
            QueryMode::Params(_) => "params",
        }
    }

    /// Context lines make no sense around a block that already spans its body
    pub fn supports_context(&self) -> bool {
        !matches!(self, QueryMode::Find(_))
    }
}

/// One match: 1-based line number and the rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
    pub line: usize,
    pub text: String,
}

impl QueryHit {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// Inputs shared by every query function
pub struct QuerySource<'a> {
    pub base: BaseExtractor<'a>,
    pub lines: &'a [String],
}

impl<'a> QuerySource<'a> {
    /// Trimmed text of the line containing the node
    pub fn line_text(&self, node: &Node) -> String {
        self.lines
            .get(node.start_position().row)
            .map(|l| l.trim().to_string())
            .unwrap_or_default()
    }
}

/// Split decoded source into lines (`\n` or `\r\n`)
pub fn source_lines(source: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(source)
        .lines()
        .map(|l| l.to_string())
        .collect()
}

/// Run one mode against an already parsed tree
pub fn run_query(mode: &QueryMode, source: &[u8], tree: &Tree, lines: &[String]) -> Vec<QueryHit> {
    let src = QuerySource {
        base: BaseExtractor::new(source),
        lines,
    };
    let root = tree.root_node();
    match mode {
        QueryMode::Classes => declarations::classes(&src, root),
        QueryMode::Methods => declarations::methods(&src, root),
        QueryMode::Fields => declarations::fields(&src, root),
        QueryMode::Calls(name) => references::calls(&src, root, name),
        QueryMode::Implements(ty) => references::implements(&src, root, ty),
        QueryMode::Uses(ty) => references::uses(&src, root, ty),
        QueryMode::FieldType(ty) => references::field_type(&src, root, ty),
        QueryMode::ParamType(ty) => references::param_type(&src, root, ty),
        QueryMode::Casts(ty) => references::casts(&src, root, ty),
        QueryMode::Ident(name) => references::ident(&src, root, name),
        QueryMode::Attrs(filter) => declarations::attrs(&src, root, filter.as_deref()),
        QueryMode::Usings => declarations::usings(&src, root),
        QueryMode::Find(name) => declarations::find(&src, root, name),
        QueryMode::Params(name) => declarations::params(&src, root, name),
    }
}

/// Parse and query a source buffer. Unparseable input yields no hits.
pub fn query_source(mode: &QueryMode, source: &[u8]) -> Vec<QueryHit> {
    let Some(tree) = parse_csharp(source) else {
        return Vec::new();
    };
    let lines = source_lines(source);
    run_query(mode, source, &tree, &lines)
}

/// Hits for one file, with the lines needed to print context
#[derive(Debug, Clone)]
pub struct FileHits {
    pub path: PathBuf,
    pub hits: Vec<QueryHit>,
    pub lines: Vec<String>,
}

/// Read, parse and query one file
pub fn query_file(path: &Path, mode: &QueryMode) -> Result<FileHits> {
    let source = std::fs::read(path).map_err(|e| CodeSearchError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let lines = source_lines(&source);
    let hits = match parse_csharp(&source) {
        Some(tree) => run_query(mode, &source, &tree, &lines),
        None => {
            debug!("Failed to parse {}", path.display());
            Vec::new()
        }
    };
    Ok(FileHits {
        path: path.to_path_buf(),
        hits,
        lines,
    })
}

/// Query files in parallel, keeping input order. Unreadable files are
/// logged and skipped.
pub fn query_files(paths: &[PathBuf], mode: &QueryMode) -> Vec<FileHits> {
    paths
        .par_iter()
        .filter_map(|path| match query_file(path, mode) {
            Ok(hits) => Some(hits),
            Err(e) => {
                error!("{}", e);
                None
            }
        })
        .collect()
}
