//! Most-recently-used project list with file-backed persistence.
//!
//! The list is stored as a newline-delimited text file of canonical absolute
//! paths, most recent first. Reads are cached and invalidated by the backing
//! file's modification time; writes go through a temp file in the same
//! directory followed by an atomic rename so readers never observe a partial
//! file. A missing or unreadable file is treated as an empty list.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write as _};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime};

/// Maximum number of entries kept in the MRU list.
pub const MAX_ITEMS: usize = 20;

/// Suffix appended to the backing file name for the atomic-write temp file.
const TEMP_SUFFIX: &str = ".tmp";

/// What: Normalize a project identifier into its canonical absolute storage key.
///
/// Inputs:
/// - `identifier`: User-supplied project path, relative or absolute
/// - `base_dir`: Directory relative identifiers are resolved against
///
/// Output:
/// - Canonical absolute path; lexically cleaned (`.`/`..` collapsed), symlinks
///   are not resolved.
///
/// Details:
/// - When the current directory cannot be determined for a relative join, the
///   joined (uncleaned) path is returned instead of failing the caller.
#[must_use]
pub fn normalize(identifier: &str, base_dir: &Path) -> PathBuf {
    let raw = Path::new(identifier);
    let joined = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        base_dir.join(raw)
    };
    absolutize(&joined).unwrap_or(joined)
}

/// Make `path` absolute (prepending the current directory when needed) and
/// lexically clean it. Returns `None` when the current directory is unknown.
fn absolutize(path: &Path) -> Option<PathBuf> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    Some(clean_path(&abs))
}

/// Lexically clean a path: drop `.` components and collapse `..` where a
/// parent component exists. No filesystem access.
fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.is_absolute() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// What: Convert a canonical absolute path back into its display-relative form.
///
/// Inputs:
/// - `canonical`: Stored absolute path
/// - `base_dir`: Managed root the result is made relative to
///
/// Output:
/// - `Some(relative)` when `canonical` lives under `base_dir`; `None` when it
///   would escape the base (never leak paths outside the managed root).
#[must_use]
pub fn to_display(canonical: &Path, base_dir: &Path) -> Option<String> {
    let rel = canonical.strip_prefix(base_dir).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(rel.to_string_lossy().into_owned())
}

/// Check whether a stored entry still resolves to a directory on disk.
fn entry_exists(entry: &str, base_dir: &Path) -> bool {
    let p = Path::new(entry);
    let full = if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    };
    full.is_dir()
}

/// In-memory list/index pair guarded by the store's lock.
#[derive(Default)]
struct MruState {
    /// Canonical absolute paths, most recently used first.
    items: Vec<String>,
    /// Path -> position map, rebuilt in bulk whenever positions shift.
    index: HashMap<String, usize>,
    /// Whether the in-memory list diverges from the persisted file.
    dirty: bool,
    /// Allow the next save to write an empty file (explicit clear/remove).
    persist_empty: bool,
    /// Modification time of the backing file at the last load or save.
    last_mod: Option<SystemTime>,
    /// Whether the initial lazy load has run.
    initialized: bool,
}

/// File-backed MRU list of project paths.
///
/// All operations are safe to call from multiple threads of a single process;
/// cross-process writers are only coordinated by the atomic rename (last
/// writer wins).
pub struct MruList {
    /// Backing file holding one canonical absolute path per line.
    file: PathBuf,
    /// Managed root for relative identifiers and display conversion.
    base_dir: PathBuf,
    /// Shared list/index state.
    state: RwLock<MruState>,
    /// Handle of the deferred flush task, when started.
    autoflush: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl MruList {
    /// What: Open an MRU list backed by `file` with identifiers resolved
    /// against `base_dir`.
    ///
    /// Output:
    /// - Always succeeds; a missing or unreadable file yields an empty list.
    ///
    /// Details:
    /// - The file is not touched here; the first read triggers the lazy load.
    #[must_use]
    pub fn open(file: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            base_dir: base_dir.into(),
            state: RwLock::new(MruState::default()),
            autoflush: Mutex::new(None),
        }
    }

    /// What: Current entries as display-relative paths, most recent first.
    ///
    /// Details:
    /// - Reloads from disk only when the backing file's modification time is
    ///   newer than the last loaded snapshot.
    /// - Entries outside the managed root are silently dropped from the
    ///   result rather than aborting the call.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        {
            let state = self.read_lock();
            if state.initialized && !self.is_stale(&state) {
                return self.display_list(&state);
            }
        }
        let mut state = self.write_lock();
        self.load_if_changed(&mut state);
        self.display_list(&state)
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut state = self.write_lock();
        self.ensure_initialized(&mut state);
        state.items.len()
    }

    /// Whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What: O(1) membership check via the index; lazy-loads on first use.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        let canonical = self.canonical_key(identifier);
        {
            let state = self.read_lock();
            if state.initialized {
                return state.index.contains_key(&canonical);
            }
        }
        let mut state = self.write_lock();
        self.ensure_initialized(&mut state);
        state.index.contains_key(&canonical)
    }

    /// What: Promote `identifier` to the front, inserting it when absent.
    ///
    /// # Errors
    /// - Returns `Err` only when the durable write cannot complete; the
    ///   in-memory state still reflects the update so the session continues
    ///   with fresh data.
    ///
    /// Details:
    /// - Already at the front: no-op, no write.
    /// - Present elsewhere: moved to the front.
    /// - Absent at capacity: the least recently used entry is evicted first.
    pub fn update(&self, identifier: &str) -> io::Result<()> {
        let canonical = self.canonical_key(identifier);
        let mut state = self.write_lock();
        self.ensure_initialized(&mut state);

        if let Some(&pos) = state.index.get(&canonical) {
            if pos == 0 {
                return Ok(());
            }
            state.items.remove(pos);
            state.items.insert(0, canonical);
            rebuild_index(&mut state);
        } else {
            if state.items.len() >= MAX_ITEMS
                && let Some(evicted) = state.items.pop()
            {
                state.index.remove(&evicted);
            }
            state.items.insert(0, canonical);
            rebuild_index(&mut state);
        }

        state.dirty = true;
        self.save_locked(&mut state)
    }

    /// What: Remove `identifier` from the list; no-op when absent.
    ///
    /// # Errors
    /// - Returns `Err` when the shrunken list cannot be written to disk.
    pub fn remove(&self, identifier: &str) -> io::Result<()> {
        let canonical = self.canonical_key(identifier);
        let mut state = self.write_lock();
        self.ensure_initialized(&mut state);

        let Some(&pos) = state.index.get(&canonical) else {
            return Ok(());
        };
        state.items.remove(pos);
        state.index.remove(&canonical);
        rebuild_index(&mut state);
        state.dirty = true;
        if state.items.is_empty() {
            state.persist_empty = true;
        }
        self.save_locked(&mut state)
    }

    /// What: Empty the list and persist the empty file.
    ///
    /// # Errors
    /// - Returns `Err` when the empty file cannot be written.
    ///
    /// Details:
    /// - Unlike the ordinary save path, an explicit clear is allowed to write
    ///   an empty file so the user's request is not silently dropped.
    pub fn clear(&self) -> io::Result<()> {
        let mut state = self.write_lock();
        state.initialized = true;
        state.items.clear();
        state.index.clear();
        state.dirty = true;
        state.persist_empty = true;
        self.save_locked(&mut state)
    }

    /// What: Drop entries whose directories no longer exist.
    ///
    /// # Errors
    /// - Returns `Err` when the pruned list cannot be written to disk.
    ///
    /// Details:
    /// - Persists only when something was removed, to avoid needless writes.
    pub fn cleanup(&self) -> io::Result<()> {
        let mut state = self.write_lock();
        self.ensure_initialized(&mut state);

        let before = state.items.len();
        let base = &self.base_dir;
        state.items.retain(|item| entry_exists(item, base));
        if state.items.len() == before {
            return Ok(());
        }
        rebuild_index(&mut state);
        state.dirty = true;
        if state.items.is_empty() {
            state.persist_empty = true;
        }
        self.save_locked(&mut state)
    }

    /// What: Force a write when the dirty flag is set; no-op otherwise.
    ///
    /// # Errors
    /// - Returns `Err` when the dirty state cannot be written to disk.
    pub fn flush(&self) -> io::Result<()> {
        let mut state = self.write_lock();
        self.save_locked(&mut state)
    }

    /// What: Start the deferred flush task writing dirty state every `every`.
    ///
    /// Details:
    /// - Owned by this store instance and cancelled by [`MruList::close`];
    ///   starting again replaces (and cancels) a previous task.
    /// - Requires a Tokio runtime.
    pub fn start_autoflush(self: Arc<Self>, every: Duration) {
        let store = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let store = Arc::clone(&store);
                match tokio::task::spawn_blocking(move || store.flush()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!(error = %e, "deferred MRU flush failed"),
                    Err(e) => tracing::warn!(error = %e, "deferred MRU flush task failed"),
                }
            }
        });
        if let Some(old) = self.flush_task_slot().replace(handle) {
            old.abort();
        }
    }

    /// What: Cancel the deferred flush task and write any dirty state.
    ///
    /// # Errors
    /// - Returns `Err` when the final flush cannot be written to disk.
    pub fn close(&self) -> io::Result<()> {
        if let Some(handle) = self.flush_task_slot().take() {
            handle.abort();
        }
        self.flush()
    }

    /// Normalize an identifier into the storage-key string form.
    fn canonical_key(&self, identifier: &str) -> String {
        normalize(identifier, &self.base_dir)
            .to_string_lossy()
            .into_owned()
    }

    /// Map the in-memory list to display-relative paths, dropping entries
    /// that cannot be represented under the base dir.
    fn display_list(&self, state: &MruState) -> Vec<String> {
        state
            .items
            .iter()
            .filter_map(|item| to_display(Path::new(item), &self.base_dir))
            .collect()
    }

    /// Whether the cached snapshot no longer matches the backing file.
    ///
    /// Serves the cache only when the file's mtime is not newer than the last
    /// load and the in-memory list is non-empty; a vanished file invalidates
    /// a non-empty cache.
    fn is_stale(&self, state: &MruState) -> bool {
        fs::metadata(&self.file)
            .ok()
            .and_then(|m| m.modified().ok())
            .map_or_else(
                || !state.items.is_empty() || state.last_mod.is_some(),
                |m| state.items.is_empty() || state.last_mod.is_none_or(|last| m > last),
            )
    }

    /// Run the initial lazy load exactly once.
    fn ensure_initialized(&self, state: &mut MruState) {
        if state.initialized {
            return;
        }
        self.load_if_changed(state);
    }

    /// What: Reload the list from disk when the backing file changed.
    ///
    /// Details:
    /// - A missing file resets to an empty list and a zeroed load time.
    /// - Read or parse failures reset to empty and never propagate; a corrupt
    ///   MRU file must not block the launch workflow.
    fn load_if_changed(&self, state: &mut MruState) {
        state.initialized = true;
        let Ok(meta) = fs::metadata(&self.file) else {
            state.items.clear();
            state.index.clear();
            state.last_mod = None;
            return;
        };
        let modified = meta.modified().ok();
        if let (Some(m), Some(last)) = (modified, state.last_mod)
            && m <= last
            && !state.items.is_empty()
        {
            return;
        }
        if let Err(e) = self.load_from_file(state) {
            tracing::warn!(path = %self.file.display(), error = %e, "failed to read MRU file; starting empty");
            state.items.clear();
            state.index.clear();
            return;
        }
        state.last_mod = modified;
    }

    /// What: Parse the backing file line by line with self-healing cleanup.
    ///
    /// Details:
    /// - Blank lines are ignored, duplicates within the pass are skipped, and
    ///   entries whose directory no longer exists are dropped.
    /// - Accepts at most [`MAX_ITEMS`] entries.
    /// - When anything was dropped the store is marked dirty so the cleaned
    ///   view is persisted back on the next write.
    fn load_from_file(&self, state: &mut MruState) -> io::Result<()> {
        let content = fs::read_to_string(&self.file)?;

        let mut seen: HashSet<&str> = HashSet::with_capacity(MAX_ITEMS);
        let mut accepted: Vec<String> = Vec::with_capacity(MAX_ITEMS);
        let mut dropped = false;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !seen.insert(line) {
                dropped = true;
                continue;
            }
            if accepted.len() < MAX_ITEMS && entry_exists(line, &self.base_dir) {
                accepted.push(line.to_string());
            } else {
                dropped = true;
            }
        }

        if dropped {
            state.dirty = true;
        }
        state.items = accepted;
        rebuild_index(state);
        Ok(())
    }

    /// What: Persist the list with atomic-write discipline.
    ///
    /// Details:
    /// - No-op when not dirty, or when the list is empty and no explicit
    ///   clear requested an empty write.
    /// - Writes to a temp file in the same directory (same-filesystem rename
    ///   semantics), syncs it, then renames over the target. On any failure
    ///   the temp file is removed and the previous file stays untouched.
    fn save_locked(&self, state: &mut MruState) -> io::Result<()> {
        if !state.dirty {
            return Ok(());
        }
        if state.items.is_empty() && !state.persist_empty {
            return Ok(());
        }

        let mut tmp_name = self.file.as_os_str().to_os_string();
        tmp_name.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp_name);

        if let Err(e) = write_entries(&tmp, &state.items) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp, &self.file) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        state.dirty = false;
        state.persist_empty = false;
        state.last_mod = fs::metadata(&self.file)
            .ok()
            .and_then(|m| m.modified().ok());
        Ok(())
    }

    /// Shared-lock accessor tolerating poisoning.
    fn read_lock(&self) -> RwLockReadGuard<'_, MruState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive-lock accessor tolerating poisoning.
    fn write_lock(&self) -> RwLockWriteGuard<'_, MruState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accessor for the flush-task slot tolerating poisoning.
    fn flush_task_slot(&self) -> std::sync::MutexGuard<'_, Option<tokio::task::JoinHandle<()>>> {
        self.autoflush.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rebuild the path -> position index from the ordered list.
fn rebuild_index(state: &mut MruState) {
    state.index.clear();
    for (i, item) in state.items.iter().enumerate() {
        state.index.insert(item.clone(), i);
    }
}

/// Write all entries newline-separated to `tmp` and sync it to disk.
fn write_entries(tmp: &Path, items: &[String]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    let mut buf = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        buf.push_str(item);
    }
    file.write_all(buf.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let root = tempfile::tempdir().expect("tempdir");
        let base = root.path().join("dev");
        std::fs::create_dir_all(&base).expect("base dir");
        let file = root.path().join("mru.txt");
        (root, file, base)
    }

    fn mkproj(base: &Path, name: &str) -> PathBuf {
        let dir = base.join(name);
        std::fs::create_dir_all(&dir).expect("project dir");
        dir
    }

    /// What: Relative identifiers join onto the base dir and get cleaned.
    #[test]
    fn normalize_joins_and_cleans() {
        let base = Path::new("/home/me/dev");
        assert_eq!(normalize("proj", base), PathBuf::from("/home/me/dev/proj"));
        assert_eq!(
            normalize("a/./b/../c", base),
            PathBuf::from("/home/me/dev/a/c")
        );
        assert_eq!(normalize("/abs/x", base), PathBuf::from("/abs/x"));
    }

    /// What: Display conversion refuses paths escaping the managed root.
    #[test]
    fn to_display_rejects_escapes() {
        let base = Path::new("/home/me/dev");
        assert_eq!(
            to_display(Path::new("/home/me/dev/proj"), base).as_deref(),
            Some("proj")
        );
        assert_eq!(to_display(Path::new("/etc/passwd"), base), None);
        assert_eq!(to_display(Path::new("/home/me/dev"), base), None);
    }

    /// What: Empty store reads empty; one update surfaces that project.
    #[test]
    fn empty_store_then_single_update() {
        let (_root, file, base) = fixture();
        mkproj(&base, "proj");
        let mru = MruList::open(&file, &base);
        assert!(mru.items().is_empty());
        mru.update("proj").expect("update");
        assert_eq!(mru.items(), vec!["proj".to_string()]);
    }

    /// What: Capacity never exceeds the maximum and the newest entry leads.
    #[test]
    fn capacity_bound_and_eviction() {
        let (_root, file, base) = fixture();
        for i in 0..MAX_ITEMS {
            mkproj(&base, &format!("p{i}"));
        }
        let mru = MruList::open(&file, &base);
        for i in 0..MAX_ITEMS {
            mru.update(&format!("p{i}")).expect("update");
        }
        assert_eq!(mru.len(), MAX_ITEMS);

        // A brand-new 21st project evicts the least recently used (p0).
        mkproj(&base, "fresh");
        mru.update("fresh").expect("update");
        let items = mru.items();
        assert_eq!(items.len(), MAX_ITEMS);
        assert_eq!(items.first().map(String::as_str), Some("fresh"));
        assert!(!items.iter().any(|p| p == "p0"));
        assert!(!mru.contains("p0"));
    }

    /// What: Updating an existing entry promotes without duplicating.
    #[test]
    fn promotion_does_not_duplicate() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        mkproj(&base, "b");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        mru.update("b").expect("update");
        mru.update("a").expect("update");
        assert_eq!(mru.items(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(mru.len(), 2);
    }

    /// What: An entry already at the front short-circuits without writing.
    #[test]
    fn front_update_skips_write() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        let before = std::fs::metadata(&file).expect("meta").modified().expect("mtime");
        mru.update("a").expect("update");
        let after = std::fs::metadata(&file).expect("meta").modified().expect("mtime");
        assert_eq!(before, after);
    }

    /// What: A reopened store round-trips order from disk.
    #[test]
    fn round_trip_across_open() {
        let (_root, file, base) = fixture();
        mkproj(&base, "one");
        mkproj(&base, "two");
        mkproj(&base, "three");
        {
            let mru = MruList::open(&file, &base);
            mru.update("one").expect("update");
            mru.update("two").expect("update");
            mru.update("three").expect("update");
        }
        let reopened = MruList::open(&file, &base);
        assert_eq!(
            reopened.items(),
            vec!["three".to_string(), "two".to_string(), "one".to_string()]
        );
    }

    /// What: Stale entries are dropped on load and the cleaned view persists.
    #[test]
    fn load_drops_stale_and_duplicate_lines() {
        let (_root, file, base) = fixture();
        let valid = mkproj(&base, "alive");
        let stale = base.join("gone");
        let body = format!(
            "{}\n{}\n\n{}\n",
            stale.display(),
            valid.display(),
            valid.display()
        );
        std::fs::write(&file, body).expect("seed file");

        let mru = MruList::open(&file, &base);
        assert_eq!(mru.items(), vec!["alive".to_string()]);
        // The dropped lines marked the store dirty; flushing persists the
        // cleaned view.
        mru.flush().expect("flush");
        let on_disk = std::fs::read_to_string(&file).expect("read back");
        assert_eq!(on_disk.trim(), valid.display().to_string());
    }

    /// What: A file whose only defect is duplication is rewritten deduped.
    #[test]
    fn load_marks_dirty_on_duplicates_alone() {
        let (_root, file, base) = fixture();
        let valid = mkproj(&base, "proj");
        let body = format!("{}\n{}\n", valid.display(), valid.display());
        std::fs::write(&file, body).expect("seed file");

        let mru = MruList::open(&file, &base);
        assert_eq!(mru.items(), vec!["proj".to_string()]);
        mru.flush().expect("flush");
        let on_disk = std::fs::read_to_string(&file).expect("read back");
        assert_eq!(on_disk.trim(), valid.display().to_string());
        assert_eq!(on_disk.matches("proj").count(), 1);
    }

    /// What: cleanup removes vanished directories and survives a fresh open.
    #[test]
    fn cleanup_persists_and_survives_reopen() {
        let (_root, file, base) = fixture();
        mkproj(&base, "keep");
        let doomed = mkproj(&base, "doomed");
        let mru = MruList::open(&file, &base);
        mru.update("keep").expect("update");
        mru.update("doomed").expect("update");

        std::fs::remove_dir_all(&doomed).expect("delete project");
        mru.cleanup().expect("cleanup");
        assert_eq!(mru.items(), vec!["keep".to_string()]);

        let reopened = MruList::open(&file, &base);
        assert_eq!(reopened.items(), vec!["keep".to_string()]);
    }

    /// What: cleanup with nothing stale leaves the file untouched.
    #[test]
    fn cleanup_without_changes_does_not_write() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        let before = std::fs::metadata(&file).expect("meta").modified().expect("mtime");
        mru.cleanup().expect("cleanup");
        let after = std::fs::metadata(&file).expect("meta").modified().expect("mtime");
        assert_eq!(before, after);
    }

    /// What: An explicit clear persists an empty file.
    #[test]
    fn clear_writes_empty_file() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        mru.clear().expect("clear");
        assert!(mru.items().is_empty());
        let on_disk = std::fs::read_to_string(&file).expect("read back");
        assert!(on_disk.is_empty());
    }

    /// What: A failed save leaves the previous file byte-identical.
    #[test]
    fn failed_save_preserves_previous_file() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        mkproj(&base, "b");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        let before = std::fs::read(&file).expect("read");

        // Occupy the temp-file path with a directory so the write fails
        // before any rename can happen.
        let mut tmp_name = file.as_os_str().to_os_string();
        tmp_name.push(TEMP_SUFFIX);
        let tmp = PathBuf::from(tmp_name);
        std::fs::create_dir_all(&tmp).expect("block temp path");

        assert!(mru.update("b").is_err());
        let after = std::fs::read(&file).expect("read");
        assert_eq!(before, after);

        // In-memory state still reflects the update.
        assert_eq!(
            mru.items(),
            vec!["b".to_string(), "a".to_string()]
        );

        // Once the obstruction is gone, flush succeeds with the fresh state.
        std::fs::remove_dir_all(&tmp).expect("unblock temp path");
        mru.flush().expect("flush");
        let on_disk = std::fs::read_to_string(&file).expect("read back");
        assert!(on_disk.lines().next().is_some_and(|l| l.ends_with("/b")));
    }

    /// What: An external rewrite of the file is picked up by mtime checking.
    #[test]
    fn external_write_invalidates_cache() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        mkproj(&base, "b");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        assert_eq!(mru.items(), vec!["a".to_string()]);

        // Simulate another process replacing the file; bump the mtime well
        // past the recorded one so coarse filesystem clocks cannot mask it.
        std::thread::sleep(Duration::from_millis(20));
        std::fs::write(&file, format!("{}\n", base.join("b").display())).expect("rewrite");
        let far = std::time::SystemTime::now() + Duration::from_secs(5);
        let _ = std::fs::File::open(&file).and_then(|f| f.set_modified(far));

        assert_eq!(mru.items(), vec!["b".to_string()]);
    }

    /// What: remove drops an entry and is a no-op for unknown identifiers.
    #[test]
    fn remove_is_noop_when_absent() {
        let (_root, file, base) = fixture();
        mkproj(&base, "a");
        let mru = MruList::open(&file, &base);
        mru.update("a").expect("update");
        mru.remove("missing").expect("remove absent");
        assert_eq!(mru.items(), vec!["a".to_string()]);
        mru.remove("a").expect("remove");
        assert!(mru.items().is_empty());
        assert!(!mru.contains("a"));
    }
}
