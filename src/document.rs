//! Document projection: one source file plus its symbol record becomes one
//! searchable document.
//!
//! Document ids are the MD5 of the relative path, so the same file maps to
//! the same document on every run and a delete never needs to read content.

use crate::config::Config;
use crate::error::{CodeSearchError, Result};
use crate::extractors::{ExtractorManager, SymbolRecord};
use crate::utils::paths::to_relative_unix_style;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// A file read fresh from disk for one extraction
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Relative to the source root, `/` separators
    pub relative_path: String,
    /// Lower-case, no dot
    pub extension: String,
    pub subsystem: String,
    /// Unix seconds
    pub mtime: i64,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Stat and read `path`. Fails with `FileRead` when either step fails.
    pub fn read(root: &Path, path: &Path) -> Result<Self> {
        let read_err = |e: std::io::Error| CodeSearchError::FileRead {
            path: path.to_path_buf(),
            source: e,
        };
        let metadata = std::fs::metadata(path).map_err(read_err)?;
        let bytes = std::fs::read(path).map_err(read_err)?;
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let relative_path = to_relative_unix_style(path, root)?;
        Ok(Self {
            path: path.to_path_buf(),
            extension: extension_of(path),
            subsystem: subsystem_from_path(&relative_path),
            relative_path,
            mtime,
            bytes,
        })
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// The searchable document stored for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    pub path: String,
    pub relative_path: String,
    pub filename: String,
    pub extension: String,
    pub subsystem: String,
    pub namespace: String,
    pub class_names: Vec<String>,
    pub method_names: Vec<String>,
    /// Type and member names; never empty because the collection requires it
    pub symbols: Vec<String>,
    pub content: String,
    pub mtime: i64,
    pub priority: i32,
    pub base_types: Vec<String>,
    pub call_sites: Vec<String>,
    pub method_sigs: Vec<String>,
    pub type_refs: Vec<String>,
    pub attributes: Vec<String>,
    pub usings: Vec<String>,
}

/// MD5 hex of the relative path
pub fn file_id(relative_path: &str) -> String {
    let digest = md5::compute(relative_path.as_bytes());
    format!("{:x}", digest)
}

/// Lower-case extension without the dot, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// First segment of the relative path (`"services/api/Foo.cs"` → `"services"`)
pub fn subsystem_from_path(relative_path: &str) -> String {
    relative_path
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Search ranking boost by extension
pub fn priority_for_extension(extension: &str) -> i32 {
    match extension {
        "cs" => 3,
        "h" | "hpp" | "cpp" | "c" | "idl" => 2,
        "py" | "ts" | "js" | "ps1" | "sh" | "cmd" | "bat" => 1,
        _ => 0,
    }
}

/// Combine a file and its symbols into a document
pub fn project(file: &SourceFile, record: &SymbolRecord, config: &Config) -> IndexDocument {
    let mut symbols = crate::extractors::base::dedupe(
        record
            .class_names
            .iter()
            .chain(record.method_names.iter())
            .cloned(),
    );
    if symbols.is_empty() {
        symbols.push(String::new());
    }

    let content: String = String::from_utf8_lossy(&file.bytes)
        .chars()
        .take(config.max_content_chars)
        .collect();

    IndexDocument {
        id: file_id(&file.relative_path),
        path: file.path.to_string_lossy().to_string(),
        relative_path: file.relative_path.clone(),
        filename: file.filename(),
        extension: file.extension.clone(),
        subsystem: file.subsystem.clone(),
        namespace: record.namespace.clone(),
        class_names: record.class_names.clone(),
        method_names: record.method_names.clone(),
        symbols,
        content,
        mtime: file.mtime,
        priority: priority_for_extension(&file.extension),
        base_types: record.base_types.clone(),
        call_sites: record.call_sites.clone(),
        method_sigs: record.method_sigs.clone(),
        type_refs: record.type_refs.clone(),
        attributes: record.attributes.clone(),
        usings: record.usings.clone(),
    }
}

/// Read, extract and project one file
pub fn build_document(root: &Path, path: &Path, config: &Config) -> Result<IndexDocument> {
    let file = SourceFile::read(root, path)?;
    let record = ExtractorManager::new().extract(&file.extension, &file.bytes);
    Ok(project(&file, &record, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_id_depends_only_on_relative_path() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let path = write(dir.path(), "billing/Invoice.cs", "class Invoice { }");
        let first = build_document(dir.path(), &path, &config).unwrap();

        std::fs::write(&path, "class Invoice { void Pay() { } }").unwrap();
        let second = build_document(dir.path(), &path, &config).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.id, file_id("billing/Invoice.cs"));
        assert_eq!(first.id, format!("{:x}", md5::compute(b"billing/Invoice.cs")));
        assert_ne!(first.method_names, second.method_names);
    }

    #[test]
    fn test_projection_fields() {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let path = write(
            dir.path(),
            "services/api/Handler.CS",
            "namespace Api { class Handler : IHandler { void Run() { Go(); } } }",
        );
        let doc = build_document(dir.path(), &path, &config).unwrap();

        assert_eq!(doc.relative_path, "services/api/Handler.CS");
        assert_eq!(doc.filename, "Handler.CS");
        assert_eq!(doc.extension, "cs");
        assert_eq!(doc.subsystem, "services");
        assert_eq!(doc.namespace, "Api");
        assert_eq!(doc.priority, 3);
        assert_eq!(doc.symbols, vec!["Handler", "Run"]);
        assert_eq!(doc.base_types, vec!["IHandler"]);
        assert_eq!(doc.call_sites, vec!["Go"]);
        assert!(doc.mtime > 0);
    }

    #[test]
    fn test_non_csharp_has_placeholder_symbol() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "README.md", "# Title");
        let doc = build_document(dir.path(), &path, &Config::default()).unwrap();
        assert_eq!(doc.symbols, vec![""]);
        assert_eq!(doc.priority, 0);
        assert!(doc.class_names.is_empty());
    }

    #[test]
    fn test_content_is_truncated_by_characters() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            max_content_chars: 10,
            ..Config::default()
        };
        let path = write(dir.path(), "notes.txt", &"é".repeat(50));
        let doc = build_document(dir.path(), &path, &config).unwrap();
        assert_eq!(doc.content.chars().count(), 10);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = build_document(dir.path(), &dir.path().join("gone.cs"), &Config::default())
            .unwrap_err();
        assert!(matches!(err, CodeSearchError::FileRead { .. }));
    }

    #[test]
    fn test_priorities() {
        assert_eq!(priority_for_extension("cs"), 3);
        assert_eq!(priority_for_extension("hpp"), 2);
        assert_eq!(priority_for_extension("ps1"), 1);
        assert_eq!(priority_for_extension("json"), 0);
    }

    #[test]
    fn test_subsystem() {
        assert_eq!(subsystem_from_path("a/b/c.cs"), "a");
        assert_eq!(subsystem_from_path("root.cs"), "root.cs");
    }
}
