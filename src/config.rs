//! Codesearch configuration.
//!
//! One immutable [`Config`] is built at start-up (JSON file with per-field
//! defaults) and handed by reference to every component that needs it.

use crate::error::{CodeSearchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "codesearch.json";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    /// Root of the source tree. Relative paths and subsystems are computed against it.
    pub src_root: Option<PathBuf>,
    /// Tracked extensions, lower-case, without the leading dot
    pub include_extensions: Vec<String>,
    /// Directory names never indexed (dot-directories are always excluded)
    pub exclude_dirs: Vec<String>,
    /// Files larger than this are skipped silently
    pub max_file_bytes: u64,
    /// Stored content is truncated to this many characters
    pub max_content_chars: usize,
    /// Documents per import call in the bulk indexer
    pub batch_size: usize,
    /// Quiet period before the watcher flushes its buffer
    pub debounce_ms: u64,
    /// Minimum interval between bulk progress lines
    pub progress_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            src_root: None,
            include_extensions: [
                "cs", "cpp", "c", "h", "hpp", "idl", "dsc", "inc", "props", "targets", "csproj",
                "py", "sh", "cmd", "bat", "ps1", "ts", "js", "json", "xml", "yaml", "yml", "md",
                "txt", "sql",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_dirs: [
                "Target",
                "Build",
                "Import",
                "nugetcache",
                ".git",
                "obj",
                "bin",
                "node_modules",
                ".venv",
                "target",
                "debug",
                "ship",
                "x64",
                "x86",
                "__pycache__",
                ".vs",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_file_bytes: 512 * 1024,
            max_content_chars: 30_000,
            batch_size: 50,
            debounce_ms: 2_000,
            progress_interval_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from the given JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodeSearchError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CodeSearchError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit path, else `./codesearch.json` if present, else defaults.
    ///
    /// An explicit path that cannot be read is an error; the implicit lookup is not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = Path::new(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            debug!("Loading configuration from {}", implicit.display());
            return Self::load(implicit);
        }
        Ok(Self::default())
    }

    /// Return a copy with `src_root` replaced (CLI `--src` override)
    pub fn with_src_root(mut self, root: Option<PathBuf>) -> Self {
        if root.is_some() {
            self.src_root = root;
        }
        self
    }

    /// The configured source root, or an actionable error when missing
    pub fn require_src_root(&self) -> Result<&Path> {
        self.src_root.as_deref().ok_or_else(|| {
            CodeSearchError::Config(
                "no source root configured: set \"src_root\" in codesearch.json or pass --src"
                    .to_string(),
            )
        })
    }

    /// The configured source root as an absolute path, so stored `path`
    /// fields never depend on the working directory
    pub fn canonical_src_root(&self) -> Result<PathBuf> {
        let root = self.require_src_root()?;
        root.canonicalize().map_err(|e| {
            CodeSearchError::Config(format!("source root {}: {}", root.display(), e))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(CodeSearchError::Config("batch_size must be > 0".into()));
        }
        if self.store.collection.trim().is_empty() {
            return Err(CodeSearchError::Config(
                "store.collection must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Is this extension (without dot, any case) in the tracked set?
    pub fn is_tracked_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.include_extensions.iter().any(|e| *e == ext)
    }

    /// Is this single path component excluded from indexing?
    pub fn is_excluded_component(&self, name: &str) -> bool {
        name.starts_with('.') || self.exclude_dirs.iter().any(|d| d == name)
    }
}

/// Remote document store (Typesense) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub api_key: String,
    pub collection: String,
    pub connection_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8108,
            protocol: "http".to_string(),
            api_key: "codesearch-local".to_string(),
            collection: "codesearch_files".to_string(),
            connection_timeout_secs: 5,
        }
    }
}

impl StoreConfig {
    /// Base URL of the store, e.g. `http://localhost:8108`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}
