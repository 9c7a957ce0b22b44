//! Bulk indexing.
//!
//! Streams the source tree from a [`FileLister`], builds one document per
//! eligible file and imports them in fixed-size upsert batches. Nothing is
//! retried: unreadable files and failed batches are counted and the run
//! carries on.

use crate::config::Config;
use crate::document::{build_document, subsystem_from_path, IndexDocument};
use crate::error::{CodeSearchError, Result};
use crate::store::DocumentStore;
use crate::utils::ignore::is_indexable;
use crate::utils::paths::to_relative_unix_style;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Source of candidate files under a root. Paths are absolute.
pub trait FileLister {
    fn list<'a>(&'a self, root: &Path) -> Result<Box<dyn Iterator<Item = PathBuf> + 'a>>;
}

/// `git ls-files -z --cached --others --exclude-standard`: tracked files plus
/// untracked ones that are not ignored. Entries are NUL-separated so paths
/// reach us unquoted, whatever characters they contain.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFileLister;

struct GitFiles {
    root: PathBuf,
    child: Child,
    entries: Split<BufReader<ChildStdout>>,
}

impl Iterator for GitFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.entries.next()? {
                Ok(entry) if entry.is_empty() => continue,
                Ok(entry) => match String::from_utf8(entry) {
                    Ok(relative) => return Some(self.root.join(relative)),
                    Err(e) => warn!("Skipping non UTF-8 path from git: {:?}", e.as_bytes()),
                },
                Err(e) => warn!("Skipping unreadable git ls-files entry: {}", e),
            }
        }
    }
}

impl Drop for GitFiles {
    fn drop(&mut self) {
        // Stop early consumers from leaving a zombie behind
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl FileLister for GitFileLister {
    fn list<'a>(&'a self, root: &Path) -> Result<Box<dyn Iterator<Item = PathBuf> + 'a>> {
        let mut child = Command::new("git")
            .arg("-C")
            .arg(root)
            .args(["ls-files", "-z", "--cached", "--others", "--exclude-standard"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CodeSearchError::Config("git produced no stdout".into()))?;
        Ok(Box::new(GitFiles {
            root: root.to_path_buf(),
            child,
            entries: BufReader::new(stdout).split(b'\0'),
        }))
    }
}

/// Directory walk honoring `.gitignore`, for roots that are not git work trees
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkFileLister;

impl FileLister for WalkFileLister {
    fn list<'a>(&'a self, root: &Path) -> Result<Box<dyn Iterator<Item = PathBuf> + 'a>> {
        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false);
        let walk = builder.build().filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                Some(entry.into_path())
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Walk error: {}", e);
                None
            }
        });
        Ok(Box::new(walk))
    }
}

/// Git listing when `root` is a work tree, otherwise a directory walk
pub fn default_lister(root: &Path) -> Box<dyn FileLister> {
    if root.join(".git").exists() {
        Box::new(GitFileLister)
    } else {
        Box::new(WalkFileLister)
    }
}

/// Outcome of one bulk run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Documents the store accepted
    pub indexed: usize,
    /// Unreadable files plus documents the store rejected
    pub errors: usize,
    /// Import calls that failed as a whole
    pub failed_batches: usize,
    pub elapsed: Duration,
}

/// `45s`, `3m07s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}

/// Eligible for bulk indexing: tracked, not excluded, and within the size limit
fn is_eligible(path: &Path, root: &Path, config: &Config) -> bool {
    if !is_indexable(path, root, config) {
        return false;
    }
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.len() <= config.max_file_bytes,
        Err(_) => false,
    }
}

struct BatchRun<'a> {
    store: &'a dyn DocumentStore,
    batch: Vec<IndexDocument>,
    report: BulkReport,
}

impl BatchRun<'_> {
    fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        match self.store.import_upsert(&self.batch) {
            Ok(summary) => {
                self.report.indexed += summary.imported;
                self.report.errors += summary.failed;
                for message in &summary.errors {
                    debug!("Import rejected document: {}", message);
                }
            }
            Err(e) => {
                error!("Batch import of {} documents failed: {}", self.batch.len(), e);
                self.report.failed_batches += 1;
                self.report.errors += self.batch.len();
            }
        }
        self.batch.clear();
    }
}

/// Index every eligible file under `root`
pub fn run_bulk_index(
    store: &dyn DocumentStore,
    lister: &dyn FileLister,
    root: &Path,
    config: &Config,
    reset: bool,
) -> Result<BulkReport> {
    store.ensure_collection(reset)?;

    info!("Indexing source files under: {}", root.display());
    info!("Extensions: {}", config.include_extensions.join(", "));

    let start = Instant::now();
    let progress_every = Duration::from_secs(config.progress_interval_secs);
    let mut last_report = start;
    let mut last_report_count = 0;
    let mut current_subsystem = String::new();
    let mut run = BatchRun {
        store,
        batch: Vec::with_capacity(config.batch_size),
        report: BulkReport::default(),
    };

    for path in lister.list(root)? {
        if !is_eligible(&path, root, config) {
            continue;
        }

        if let Ok(relative) = to_relative_unix_style(&path, root) {
            let subsystem = subsystem_from_path(&relative);
            if subsystem != current_subsystem {
                info!(
                    "[{}] subsystem: {}  (total so far: {})",
                    format_elapsed(start.elapsed()),
                    subsystem,
                    run.report.indexed
                );
                current_subsystem = subsystem;
            }
        }

        match build_document(root, &path, config) {
            Ok(doc) => run.batch.push(doc),
            Err(e) => {
                warn!("{}", e);
                run.report.errors += 1;
                continue;
            }
        }

        if run.batch.len() >= config.batch_size {
            run.flush();

            let now = Instant::now();
            let since = now.duration_since(last_report);
            if since >= progress_every {
                let done = run.report.indexed - last_report_count;
                let rate = done as f64 / since.as_secs_f64().max(f64::EPSILON);
                info!(
                    "[{}] {} files indexed  ({:.0} files/s)  errors={}",
                    format_elapsed(start.elapsed()),
                    run.report.indexed,
                    rate,
                    run.report.errors
                );
                last_report = now;
                last_report_count = run.report.indexed;
            }
        }
    }
    run.flush();

    let mut report = run.report;
    report.elapsed = start.elapsed();
    let rate = report.indexed as f64 / report.elapsed.as_secs_f64().max(f64::EPSILON);
    info!(
        "Done in {}. Indexed {} files  ({:.0} files/s)  errors={}",
        format_elapsed(report.elapsed),
        report.indexed,
        rate,
        report.errors
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::file_id;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Lists a fixed set of paths, eligible or not
    struct FixedLister(Vec<PathBuf>);

    impl FileLister for FixedLister {
        fn list<'a>(&'a self, _root: &Path) -> Result<Box<dyn Iterator<Item = PathBuf> + 'a>> {
            Ok(Box::new(self.0.iter().cloned()))
        }
    }

    #[test]
    fn test_batches_and_filters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for i in 0..5 {
            write(root, &format!("core/C{i}.cs"), &format!("class C{i} {{ }}"));
        }
        write(root, "core/obj/Gen.cs", "class Gen { }");
        write(root, ".hidden/H.cs", "class H { }");
        write(root, "core/image.png", "not text");
        write(root, "core/Big.cs", &"x".repeat(200));

        let config = Config {
            batch_size: 2,
            max_file_bytes: 100,
            ..Config::default()
        };
        let store = InMemoryStore::new();
        let report = run_bulk_index(&store, &WalkFileLister, root, &config, false).unwrap();

        assert_eq!(report.indexed, 5);
        assert_eq!(report.errors, 0);
        assert_eq!(store.len(), 5);
        let sizes: Vec<usize> = store.imports().iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(store.get(&file_id("core/C3.cs")).is_some());
        assert!(store.get(&file_id("core/obj/Gen.cs")).is_none());
        assert_eq!(*store.ensure_calls.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_walk_honors_gitignore() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, ".gitignore", "generated/\n");
        write(root, "generated/G.cs", "class G { }");
        let kept = write(root, "src/K.cs", "class K { }");

        let files: Vec<PathBuf> = WalkFileLister
            .list(root)
            .unwrap()
            .filter(|p| p.extension().is_some_and(|e| e == "cs"))
            .collect();
        assert_eq!(files, vec![kept]);
    }

    #[test]
    fn test_git_lister_keeps_non_ascii_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let init = Command::new("git")
            .arg("-C")
            .arg(root)
            .args(["init", "-q"])
            .status();
        if !init.is_ok_and(|s| s.success()) {
            // no git on this machine
            return;
        }
        write(root, "src/Plain.cs", "class Plain { }");
        write(root, "src/Überweisung.cs", "class Überweisung { }");

        let mut files: Vec<PathBuf> = GitFileLister.list(root).unwrap().collect();
        files.sort();
        assert_eq!(
            files,
            vec![root.join("src/Plain.cs"), root.join("src/Überweisung.cs")]
        );

        let store = InMemoryStore::new();
        let report = run_bulk_index(&store, &GitFileLister, root, &Config::default(), false).unwrap();
        assert_eq!(report.indexed, 2);
        assert!(store.get(&file_id("src/Überweisung.cs")).is_some());
    }

    #[test]
    fn test_missing_files_are_skipped_and_reset_is_forwarded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let ok = write(root, "a/A.cs", "class A { }");
        let missing = root.join("a/Missing.cs");

        let store = InMemoryStore::new();
        let lister = FixedLister(vec![missing, ok]);
        let report = run_bulk_index(&store, &lister, root, &Config::default(), true).unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.errors, 0);
        assert_eq!(*store.ensure_calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_failed_batches_do_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| write(root, &format!("x/F{i}.cs"), "class F { }"))
            .collect();

        let config = Config {
            batch_size: 1,
            ..Config::default()
        };
        let store = InMemoryStore::failing();
        let report = run_bulk_index(&store, &FixedLister(paths), root, &config, false).unwrap();

        assert_eq!(report.indexed, 0);
        assert_eq!(report.failed_batches, 3);
        assert_eq!(report.errors, 3);
        assert_eq!(store.imports().len(), 3);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(45)), "45s");
        assert_eq!(format_elapsed(Duration::from_secs(187)), "3m07s");
    }
}
