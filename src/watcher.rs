//! Incremental index maintenance.
//!
//! Filesystem events are folded into a pending map (path → last action) and
//! flushed after a quiet period. A dedicated timer thread owns the debounce:
//! every accepted event restarts its wait, and only silence triggers a flush.
//!
//! A flush trusts the filesystem over the event log. Each pending path is
//! re-stated: present files are rebuilt and upserted as one batch, absent
//! files are deleted by id. A Delete recorded for a path that exists again by
//! flush time therefore becomes an upsert.
//!
//! Directory events are expanded to the files they cover: a directory that
//! appears is walked, and one that disappears deletes every file known to
//! have been indexed under it.

use crate::config::Config;
use crate::document::{build_document, file_id, IndexDocument};
use crate::error::{CodeSearchError, Result};
use crate::store::DocumentStore;
use crate::utils::ignore::is_indexable;
use crate::utils::paths::to_relative_unix_style;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What the last event for a path asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Upsert,
    Delete,
}

/// Map one notify event to per-path actions, before eligibility filtering.
/// A rename with both ends known yields the source delete first.
pub fn classify_event(event: &Event) -> Vec<(PathBuf, PendingAction)> {
    let all = |action: PendingAction| -> Vec<(PathBuf, PendingAction)> {
        event.paths.iter().map(|p| (p.clone(), action)).collect()
    };
    match &event.kind {
        EventKind::Create(_) => all(PendingAction::Upsert),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut actions = Vec::new();
            if let Some(from) = event.paths.first() {
                actions.push((from.clone(), PendingAction::Delete));
            }
            if let Some(to) = event.paths.get(1) {
                actions.push((to.clone(), PendingAction::Upsert));
            }
            actions
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => all(PendingAction::Delete),
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|p| {
                let action = if p.exists() {
                    PendingAction::Upsert
                } else {
                    PendingAction::Delete
                };
                (p.clone(), action)
            })
            .collect(),
        // Directory metadata changes say nothing about the files inside
        EventKind::Modify(_) => event
            .paths
            .iter()
            .filter(|p| !p.is_dir())
            .map(|p| (p.clone(), PendingAction::Upsert))
            .collect(),
        EventKind::Remove(_) => all(PendingAction::Delete),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

/// Counts from one flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub upserted: usize,
    pub deleted: usize,
    /// Present but over the size limit
    pub skipped: usize,
    pub errors: usize,
}

/// Root `.gitignore` matcher, so the watcher agrees with `git ls-files`
fn build_gitignore(root: &Path) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    if !path.is_file() {
        return None;
    }
    let mut builder = GitignoreBuilder::new(root);
    if let Some(e) = builder.add(&path) {
        warn!("Failed to parse .gitignore: {}", e);
    }
    match builder.build() {
        Ok(gi) => Some(gi),
        Err(e) => {
            warn!("Failed to build gitignore matcher: {}", e);
            None
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// State shared by the notify callback and the timer thread
struct Shared {
    root: PathBuf,
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    gitignore: Option<Gitignore>,
    pending: Mutex<HashMap<PathBuf, PendingAction>>,
    /// Files believed to be in the store, so a vanished directory can be
    /// expanded to the documents under it
    indexed: Mutex<HashSet<PathBuf>>,
    /// Held for the whole flush body so two flushes never overlap
    flush_guard: Mutex<()>,
}

impl Shared {
    fn is_eligible(&self, path: &Path) -> bool {
        if !is_indexable(path, &self.root, &self.config) {
            return false;
        }
        match (&self.gitignore, path.strip_prefix(&self.root)) {
            (Some(gi), Ok(relative)) => !gi.matched_path_or_any_parents(relative, false).is_ignore(),
            _ => true,
        }
    }

    /// Eligible files under `dir`, honoring ignore files
    fn files_under(&self, dir: &Path) -> Vec<PathBuf> {
        let mut builder = ignore::WalkBuilder::new(dir);
        builder
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false);
        builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                    Some(entry.into_path())
                }
                Ok(_) => None,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    None
                }
            })
            .filter(|path| self.is_eligible(path))
            .collect()
    }

    /// Files indexed or pending under a path that is gone
    fn known_under(&self, dir: &Path) -> Vec<PathBuf> {
        let mut known: Vec<PathBuf> = lock(&self.indexed)
            .iter()
            .filter(|p| p.starts_with(dir) && p.as_path() != dir)
            .cloned()
            .collect();
        known.extend(
            lock(&self.pending)
                .keys()
                .filter(|p| p.starts_with(dir) && p.as_path() != dir)
                .cloned(),
        );
        known
    }

    /// Per-file actions for one event path
    fn expand(&self, path: PathBuf, action: PendingAction) -> Vec<(PathBuf, PendingAction)> {
        if path.is_dir() {
            return match action {
                PendingAction::Upsert => self
                    .files_under(&path)
                    .into_iter()
                    .map(|p| (p, PendingAction::Upsert))
                    .collect(),
                // Reported gone but still there; nothing to do
                PendingAction::Delete => Vec::new(),
            };
        }
        if self.is_eligible(&path) {
            return vec![(path, action)];
        }
        if action == PendingAction::Delete && !path.exists() {
            return self
                .known_under(&path)
                .into_iter()
                .map(|p| (p, PendingAction::Delete))
                .collect();
        }
        Vec::new()
    }

    /// Buffer eligible actions; true when anything was accepted
    fn record(&self, actions: Vec<(PathBuf, PendingAction)>) -> bool {
        let expanded: Vec<(PathBuf, PendingAction)> = actions
            .into_iter()
            .flat_map(|(path, action)| self.expand(path, action))
            .collect();
        if expanded.is_empty() {
            return false;
        }
        let mut pending = lock(&self.pending);
        for (path, action) in expanded {
            debug!("Pending {:?}: {}", action, path.display());
            pending.insert(path, action);
        }
        true
    }

    fn flush(&self) -> FlushReport {
        let _guard = lock(&self.flush_guard);
        let batch = std::mem::take(&mut *lock(&self.pending));
        let mut report = FlushReport::default();
        if batch.is_empty() {
            return report;
        }

        let mut upserts: Vec<(IndexDocument, PathBuf)> = Vec::new();
        let mut deletes: Vec<(String, PathBuf)> = Vec::new();
        for (path, action) in batch {
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {
                    if meta.len() > self.config.max_file_bytes {
                        debug!("Skipping oversized {}", path.display());
                        report.skipped += 1;
                        continue;
                    }
                    if action == PendingAction::Delete {
                        debug!("{} exists again, upserting", path.display());
                    }
                    match build_document(&self.root, &path, &self.config) {
                        Ok(doc) => upserts.push((doc, path)),
                        Err(e) => {
                            warn!("{}", e);
                            report.errors += 1;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    match to_relative_unix_style(&path, &self.root) {
                        Ok(relative) => deletes.push((file_id(&relative), path)),
                        Err(e) => {
                            warn!("{}", e);
                            report.errors += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    report.errors += 1;
                }
            }
        }

        if !upserts.is_empty() {
            let (docs, paths): (Vec<IndexDocument>, Vec<PathBuf>) = upserts.into_iter().unzip();
            match self.store.import_upsert(&docs) {
                Ok(summary) => {
                    report.upserted += summary.imported;
                    report.errors += summary.failed;
                    lock(&self.indexed).extend(paths);
                }
                Err(e) => {
                    error!("Upsert of {} documents failed: {}", docs.len(), e);
                    report.errors += docs.len();
                }
            }
        }

        for (id, path) in deletes {
            match self.store.delete_document(&id) {
                Ok(true) => {
                    report.deleted += 1;
                    lock(&self.indexed).remove(&path);
                }
                Ok(false) => {
                    debug!("{} was not indexed", path.display());
                    lock(&self.indexed).remove(&path);
                }
                Err(e) => {
                    error!("Delete of {} failed: {}", path.display(), e);
                    report.errors += 1;
                }
            }
        }

        info!(
            "Flushed: {} upserted, {} deleted, {} skipped, {} errors",
            report.upserted, report.deleted, report.skipped, report.errors
        );
        report
    }
}

/// Messages for the debounce timer thread
enum TimerMessage {
    /// An event was buffered; restart the quiet period
    Touch,
    Stop,
}

fn run_timer(shared: Arc<Shared>, rx: std::sync::mpsc::Receiver<TimerMessage>, delay: Duration) {
    loop {
        // Idle: wait for the first event of a window
        match rx.recv() {
            Ok(TimerMessage::Touch) => {}
            Ok(TimerMessage::Stop) | Err(_) => break,
        }
        // Buffering: every further event restarts the wait
        loop {
            match rx.recv_timeout(delay) {
                Ok(TimerMessage::Touch) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    shared.flush();
                    break;
                }
                Ok(TimerMessage::Stop) | Err(RecvTimeoutError::Disconnected) => {
                    shared.flush();
                    return;
                }
            }
        }
    }
    shared.flush();
}

/// Watches one source root and keeps the store in step with it
pub struct IndexMaintainer {
    shared: Arc<Shared>,
    tick_tx: Option<Sender<TimerMessage>>,
    timer_thread: Option<JoinHandle<()>>,
    watcher: Option<RecommendedWatcher>,
}

impl IndexMaintainer {
    pub fn new(root: &Path, config: Arc<Config>, store: Arc<dyn DocumentStore>) -> Result<Self> {
        if !root.is_dir() {
            return Err(CodeSearchError::Config(format!(
                "Source root is not a directory: {}",
                root.display()
            )));
        }
        let root = root.canonicalize()?;
        let shared = Shared {
            gitignore: build_gitignore(&root),
            root,
            config,
            store,
            pending: Mutex::new(HashMap::new()),
            indexed: Mutex::new(HashSet::new()),
            flush_guard: Mutex::new(()),
        };
        // What the bulk indexer would have stored for this tree
        let existing = shared.files_under(&shared.root);
        debug!("{} indexable files under {}", existing.len(), shared.root.display());
        lock(&shared.indexed).extend(existing);
        Ok(Self {
            shared: Arc::new(shared),
            tick_tx: None,
            timer_thread: None,
            watcher: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.shared.root
    }

    pub fn is_running(&self) -> bool {
        self.timer_thread.is_some()
    }

    /// Number of buffered paths awaiting a flush
    pub fn pending_len(&self) -> usize {
        lock(&self.shared.pending).len()
    }

    fn start_timer(&mut self) -> Result<Sender<TimerMessage>> {
        let (tx, rx) = channel();
        let shared = Arc::clone(&self.shared);
        let delay = Duration::from_millis(self.shared.config.debounce_ms);
        let handle = thread::Builder::new()
            .name("codesearch-debounce".to_string())
            .spawn(move || run_timer(shared, rx, delay))?;
        self.timer_thread = Some(handle);
        self.tick_tx = Some(tx.clone());
        Ok(tx)
    }

    /// Start the debounce timer and the recursive filesystem watch
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(CodeSearchError::Watch("already running".into()));
        }
        let tx = Mutex::new(self.start_timer()?);
        let shared = Arc::clone(&self.shared);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if shared.record(classify_event(&event)) {
                        let _ = lock(&tx).send(TimerMessage::Touch);
                    }
                }
                Err(e) => warn!("Watch error: {}", e),
            },
            notify::Config::default(),
        )?;
        watcher.watch(&self.shared.root, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        info!(
            "Watching {} (debounce {} ms)",
            self.shared.root.display(),
            self.shared.config.debounce_ms
        );
        Ok(())
    }

    /// Feed an event as if it came from the filesystem watch
    pub fn handle_event(&self, event: &Event) {
        if self.shared.record(classify_event(event)) {
            if let Some(tx) = &self.tick_tx {
                let _ = tx.send(TimerMessage::Touch);
            }
        }
    }

    /// Flush the buffer now, regardless of the timer
    pub fn flush(&self) -> FlushReport {
        self.shared.flush()
    }

    /// Stop watching. The buffered window is flushed before this returns.
    pub fn stop(&mut self) {
        // No new events once the watch is gone
        self.watcher = None;
        if let Some(tx) = self.tick_tx.take() {
            let _ = tx.send(TimerMessage::Stop);
        }
        if let Some(handle) = self.timer_thread.take() {
            if handle.join().is_err() {
                error!("Debounce thread panicked");
            }
            info!("Watcher stopped");
        }
    }
}

impl Drop for IndexMaintainer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |e, p| e.add_path(p.to_path_buf()))
    }

    fn modify(path: &Path) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), &[path])
    }

    fn setup(config: Config) -> (TempDir, PathBuf, Arc<InMemoryStore>, IndexMaintainer) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let store = Arc::new(InMemoryStore::new());
        let maintainer = IndexMaintainer::new(&root, Arc::new(config), store.clone()).unwrap();
        (dir, root, store, maintainer)
    }

    #[test]
    fn test_classify_rename_both() {
        let from = Path::new("/r/a/Old.cs");
        let to = Path::new("/r/a/New.cs");
        let e = event(EventKind::Modify(ModifyKind::Name(RenameMode::Both)), &[from, to]);
        assert_eq!(
            classify_event(&e),
            vec![
                (from.to_path_buf(), PendingAction::Delete),
                (to.to_path_buf(), PendingAction::Upsert),
            ]
        );
    }

    #[test]
    fn test_classify_ignores_access_and_keeps_folders() {
        let p = Path::new("/r/x");
        let access = event(EventKind::Access(notify::event::AccessKind::Any), &[p]);
        assert!(classify_event(&access).is_empty());
        assert_eq!(
            classify_event(&event(EventKind::Create(CreateKind::Folder), &[p])),
            vec![(p.to_path_buf(), PendingAction::Upsert)]
        );
        assert_eq!(
            classify_event(&event(EventKind::Remove(RemoveKind::Folder), &[p])),
            vec![(p.to_path_buf(), PendingAction::Delete)]
        );
        assert_eq!(
            classify_event(&event(EventKind::Remove(RemoveKind::File), &[p])),
            vec![(p.to_path_buf(), PendingAction::Delete)]
        );
    }

    #[test]
    fn test_many_modifications_make_one_upsert() {
        let (_dir, root, store, maintainer) = setup(Config::default());
        let path = write(&root, "core/Foo.cs", "class Foo { }");
        for i in 0..10 {
            std::fs::write(&path, format!("class Foo {{ void M{i}() {{ }} }}")).unwrap();
            maintainer.handle_event(&modify(&path));
        }
        assert_eq!(maintainer.pending_len(), 1);

        let report = maintainer.flush();
        assert_eq!(report.upserted, 1);
        assert_eq!(store.imports(), vec![vec![file_id("core/Foo.cs")]]);
        let doc = store.get(&file_id("core/Foo.cs")).unwrap();
        assert_eq!(doc.method_names, vec!["M9"]);
        assert_eq!(maintainer.pending_len(), 0);
    }

    #[test]
    fn test_move_is_one_delete_and_one_upsert() {
        let (_dir, root, store, maintainer) = setup(Config::default());
        let old = write(&root, "a/Old.cs", "class Widget { }");
        maintainer.handle_event(&event(EventKind::Create(CreateKind::File), &[&old]));
        maintainer.flush();

        let new = root.join("b/New.cs");
        std::fs::create_dir_all(new.parent().unwrap()).unwrap();
        std::fs::rename(&old, &new).unwrap();
        maintainer.handle_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&old, &new],
        ));
        let report = maintainer.flush();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.upserted, 1);
        assert_eq!(store.deletes(), vec![file_id("a/Old.cs")]);
        assert_eq!(store.imports().last().unwrap(), &vec![file_id("b/New.cs")]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_directory_move_reindexes_every_file() {
        let (_dir, root, store, _) = setup(Config::default());
        write(&root, "Old/Svc.cs", "class Svc { }");
        write(&root, "Old/Deep/Repo.cs", "class Repo { }");
        write(&root, "Old/logo.png", "not tracked");
        // Started after the tree was bulk indexed
        let maintainer =
            IndexMaintainer::new(&root, Arc::new(Config::default()), store.clone()).unwrap();
        for rel in ["Old/Svc.cs", "Old/Deep/Repo.cs"] {
            store.insert(build_document(&root, &root.join(rel), &Config::default()).unwrap());
        }

        std::fs::rename(root.join("Old"), root.join("New")).unwrap();
        maintainer.handle_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&root.join("Old"), &root.join("New")],
        ));
        assert_eq!(maintainer.pending_len(), 4);
        let report = maintainer.flush();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.upserted, 2);
        assert!(store.get(&file_id("Old/Svc.cs")).is_none());
        assert!(store.get(&file_id("Old/Deep/Repo.cs")).is_none());
        assert!(store.get(&file_id("New/Svc.cs")).is_some());
        assert!(store.get(&file_id("New/Deep/Repo.cs")).is_some());

        // Moving it back uses what the last flush indexed
        std::fs::rename(root.join("New"), root.join("Old")).unwrap();
        maintainer.handle_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&root.join("New"), &root.join("Old")],
        ));
        let report = maintainer.flush();
        assert_eq!((report.deleted, report.upserted), (2, 2));
        assert_eq!(store.len(), 2);
        assert!(store.get(&file_id("Old/Svc.cs")).is_some());
    }

    #[test]
    fn test_removed_directory_deletes_its_files() {
        let (_dir, root, store, maintainer) = setup(Config::default());
        let path = write(&root, "gone/A.cs", "class A { }");
        maintainer.handle_event(&modify(&path));
        maintainer.flush();
        assert_eq!(store.len(), 1);

        std::fs::remove_dir_all(root.join("gone")).unwrap();
        maintainer.handle_event(&event(
            EventKind::Remove(RemoveKind::Folder),
            &[&root.join("gone")],
        ));
        let report = maintainer.flush();
        assert_eq!(report.deleted, 1);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_move_into_excluded_directory_only_deletes() {
        let (_dir, root, store, maintainer) = setup(Config::default());
        let old = write(&root, "src/Gen.cs", "class Gen { }");
        maintainer.handle_event(&modify(&old));
        maintainer.flush();

        let new = root.join("obj/Gen.cs");
        std::fs::create_dir_all(new.parent().unwrap()).unwrap();
        std::fs::rename(&old, &new).unwrap();
        maintainer.handle_event(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&old, &new],
        ));
        let report = maintainer.flush();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.upserted, 0);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_stale_delete_becomes_upsert_when_file_returns() {
        let (_dir, root, store, maintainer) = setup(Config::default());
        let path = write(&root, "core/Back.cs", "class Back { }");
        maintainer.handle_event(&event(EventKind::Remove(RemoveKind::File), &[&path]));

        let report = maintainer.flush();
        assert_eq!(report.upserted, 1);
        assert!(store.deletes().is_empty());
    }

    #[test]
    fn test_ineligible_paths_are_ignored() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        write(&root, ".gitignore", "generated/\n");
        let store = Arc::new(InMemoryStore::new());
        let maintainer = IndexMaintainer::new(&root, Arc::new(Config::default()), store).unwrap();

        let png = write(&root, "core/logo.png", "");
        let hidden = write(&root, ".vs/Cache.cs", "class C { }");
        let ignored = write(&root, "generated/G.cs", "class G { }");
        let dir = root.join("core");
        for path in [&png, &hidden, &ignored, &dir] {
            maintainer.handle_event(&modify(path));
        }
        assert_eq!(maintainer.pending_len(), 0);
    }

    #[test]
    fn test_oversized_files_are_skipped() {
        let config = Config {
            max_file_bytes: 10,
            ..Config::default()
        };
        let (_dir, root, store, maintainer) = setup(config);
        let path = write(&root, "core/Big.cs", "class Big { int x; int y; }");
        maintainer.handle_event(&modify(&path));

        let report = maintainer.flush();
        assert_eq!(report.skipped, 1);
        assert!(store.imports().is_empty());
    }

    #[test]
    fn test_debounce_flushes_once_after_quiet_period() {
        let config = Config {
            debounce_ms: 150,
            ..Config::default()
        };
        let (_dir, root, store, mut maintainer) = setup(config);
        maintainer.start_timer().unwrap();

        let a = write(&root, "x/A.cs", "class A { }");
        let b = write(&root, "x/B.cs", "class B { }");
        for _ in 0..3 {
            maintainer.handle_event(&modify(&a));
            maintainer.handle_event(&modify(&b));
            thread::sleep(Duration::from_millis(30));
        }
        assert!(store.imports().is_empty());

        thread::sleep(Duration::from_millis(600));
        let imports = store.imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].len(), 2);
        maintainer.stop();
    }

    #[test]
    fn test_stop_flushes_pending_window() {
        let config = Config {
            debounce_ms: 60_000,
            ..Config::default()
        };
        let (_dir, root, store, mut maintainer) = setup(config);
        maintainer.start_timer().unwrap();

        let path = write(&root, "x/Late.cs", "class Late { }");
        maintainer.handle_event(&modify(&path));
        maintainer.stop();

        assert_eq!(store.imports(), vec![vec![file_id("x/Late.cs")]]);
        assert!(!maintainer.is_running());
    }
}
