// File sets for the query command
//
// Files come either from command-line patterns (files, directories, globs)
// or from a store search whose hits are mapped back to local paths.

use crate::error::Result;
use crate::search::SearchRequest;
use crate::store::DocumentStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn is_csharp(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("cs"))
}

fn glob_files(pattern: &str) -> Vec<PathBuf> {
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    match glob::glob_with(pattern, options) {
        Ok(paths) => {
            let mut found: Vec<PathBuf> = paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        warn!("Glob error: {}", e);
                        None
                    }
                })
                .filter(|p| p.is_file())
                .collect();
            found.sort();
            found
        }
        Err(e) => {
            warn!("Invalid glob pattern {:?}: {}", pattern, e);
            Vec::new()
        }
    }
}

/// Expand files, directories (recursive) and glob patterns into a
/// deduplicated list of `.cs` files. Each pattern's matches are sorted;
/// patterns keep their command-line order.
pub fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        let matches = if is_glob(pattern) {
            glob_files(pattern)
        } else if path.is_dir() {
            let recursive = path.join("**").join("*.cs");
            glob_files(&recursive.to_string_lossy())
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            warn!("No such file or directory: {}", pattern);
            Vec::new()
        };
        for file in matches.into_iter().filter(|f| is_csharp(f)) {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }
    files
}

/// Pre-filter for the query command: search the store, keep hits that exist
/// locally, in hit order.
pub fn files_from_search(
    store: &dyn DocumentStore,
    root: Option<&Path>,
    request: &SearchRequest,
) -> Result<Vec<PathBuf>> {
    let response = store.search(&request.to_params())?;
    debug!(
        "Search {:?} returned {} of {} hits",
        request.query,
        response.hits.len(),
        response.found
    );

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for hit in &response.hits {
        let doc = &hit.document;
        let mut candidates = Vec::new();
        if !doc.path.is_empty() {
            candidates.push(PathBuf::from(&doc.path));
        }
        if let (Some(root), false) = (root, doc.relative_path.is_empty()) {
            candidates.push(crate::utils::paths::to_absolute_native(&doc.relative_path, root));
        }
        match candidates.into_iter().find(|p| p.is_file()) {
            Some(path) => {
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
            None => debug!("Search hit {} not found locally", doc.relative_path),
        }
    }
    Ok(files)
}

/// Search request used by `query --search`: `.cs` unless told otherwise
pub fn search_request(
    query: &str,
    subsystem: Option<String>,
    extension: Option<String>,
    limit: usize,
) -> SearchRequest {
    SearchRequest {
        subsystem,
        extension: Some(extension.unwrap_or_else(|| "cs".to_string())),
        limit,
        ..SearchRequest::new(query)
    }
}
