//! Project discovery under the base directory, with a short-lived scan cache.
//!
//! A project is any directory carrying a well-known indicator file (`.git`,
//! `Cargo.toml`, `package.json`, ...). The walk is bounded in depth, skips
//! well-known non-project directories, and never descends into a detected
//! project root. Scan results are cached as JSON inside the base directory so
//! repeated launches skip the filesystem walk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Scan cache file name, stored inside the base directory.
pub const CACHE_FILE_NAME: &str = ".codepick_cache.json";

/// Cached scans older than this are discarded.
const CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// Bumped whenever the scan logic changes enough to invalidate old caches.
const CACHE_VERSION: u32 = 1;

/// Maximum directory depth below the base dir the walk descends to.
const MAX_DEPTH: usize = 3;

/// Directories never worth descending into.
const SKIP_DIRS: &[&str] = &[
    // Most common first
    "node_modules",
    ".git",
    "vendor",
    "target",
    "build",
    "dist",
    // Dependencies and package managers
    "bower_components",
    // Build outputs and caches
    "out",
    "bin",
    "obj",
    "coverage",
    // Version control
    ".svn",
    ".hg",
    ".bzr",
    // Language-specific
    "__pycache__",
    "venv",
    "env",
    "site-packages",
    "Pods",
    "DerivedData",
    "cmake-build-debug",
    "cmake-build-release",
    // Temporary
    "tmp",
    "temp",
    "logs",
    "log",
];

/// Indicator files that mark a directory as a project root, ordered by
/// likelihood so the common cases exit early.
const PROJECT_INDICATORS: &[&str] = &[
    ".git",
    "package.json",
    "go.mod",
    "Cargo.toml",
    "pom.xml",
    "build.gradle",
    "Makefile",
    "CMakeLists.txt",
    "requirements.txt",
    "setup.py",
    "pyproject.toml",
    "composer.json",
    "Gemfile",
    "mix.exs",
    "elm.json",
    "deno.json",
    "pubspec.yaml",
];

/// Persisted scan cache.
#[derive(Debug, Serialize, Deserialize)]
struct ScanCache {
    /// Base-relative project paths from the last scan.
    projects: Vec<String>,
    /// When the scan ran.
    last_scan: SystemTime,
    /// Modification time of the base dir at scan time.
    base_dir_modified: SystemTime,
    /// Convenience copy of `projects.len()`.
    project_count: usize,
    /// Format/logic version for invalidation.
    cache_version: u32,
}

/// Path of the cache file for `base_dir`.
fn cache_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CACHE_FILE_NAME)
}

/// What: Find all projects under `base_dir`, serving a valid cache when present.
///
/// Output:
/// - Base-relative project paths in scan order; empty when nothing matches.
///
/// Details:
/// - A cache is valid when younger than five minutes, written by the current
///   cache version, and the base dir has not been modified since the scan.
/// - After a fresh scan the cache is saved best-effort; failures only log.
#[must_use]
pub fn find_projects(base_dir: &Path) -> Vec<String> {
    if let Some(cache) = load_cache(base_dir) {
        tracing::debug!(count = cache.projects.len(), "project scan cache hit");
        return cache.projects;
    }

    let start = SystemTime::now();
    let mut projects = Vec::new();
    scan_dir(base_dir, base_dir, 0, &mut projects);
    tracing::debug!(count = projects.len(), "scanned base dir for projects");

    save_cache(base_dir, &projects, start);
    projects
}

/// Load and validate the scan cache; `None` when absent, stale or invalid.
fn load_cache(base_dir: &Path) -> Option<ScanCache> {
    let path = cache_path(base_dir);
    let meta = fs::metadata(&path).ok()?;
    let age = meta.modified().ok().and_then(|m| m.elapsed().ok())?;
    if age > CACHE_MAX_AGE {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    let cache: ScanCache = serde_json::from_str(&data).ok()?;
    if cache.cache_version != CACHE_VERSION {
        return None;
    }

    let base_modified = fs::metadata(base_dir).ok()?.modified().ok()?;
    if base_modified > cache.base_dir_modified {
        return None;
    }
    Some(cache)
}

/// Persist the scan cache best-effort; failures are logged, never surfaced.
fn save_cache(base_dir: &Path, projects: &[String], scan_start: SystemTime) {
    // Create the file before recording the base dir's mtime: the creation
    // itself bumps the directory, and the recorded value must cover it.
    let path = cache_path(base_dir);
    if !path.exists() && fs::write(&path, "").is_err() {
        return;
    }
    let Ok(base_modified) = fs::metadata(base_dir).and_then(|m| m.modified()) else {
        return;
    };
    let cache = ScanCache {
        projects: projects.to_vec(),
        last_scan: scan_start,
        base_dir_modified: base_modified,
        project_count: projects.len(),
        cache_version: CACHE_VERSION,
    };
    match serde_json::to_string_pretty(&cache) {
        Ok(body) => {
            if let Err(e) = fs::write(&path, body) {
                tracing::warn!(error = %e, "failed to write project scan cache");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize project scan cache"),
    }
}

/// Whether a directory name should be skipped during the walk.
fn should_skip_dir(name: &str) -> bool {
    if SKIP_DIRS.contains(&name) {
        return true;
    }
    // Hidden directories are skipped wholesale; `.git` is handled as an
    // indicator, not a walk target.
    if name.starts_with('.') {
        return true;
    }
    let lower = name.to_lowercase();
    lower.contains("cmake-build-") || lower.contains(".terraform")
}

/// Whether `path` carries any project indicator file.
fn is_project_root(path: &Path) -> bool {
    PROJECT_INDICATORS
        .iter()
        .any(|marker| path.join(marker).exists())
}

/// Recursive walk collecting base-relative project paths.
///
/// Detected project roots are recorded and not descended into; the base dir
/// itself is never recorded even when it carries an indicator.
fn scan_dir(dir: &Path, base_dir: &Path, depth: usize, out: &mut Vec<String>) {
    if depth > 0 && is_project_root(dir) {
        if let Ok(rel) = dir.strip_prefix(base_dir)
            && !rel.as_os_str().is_empty()
        {
            out.push(rel.to_string_lossy().into_owned());
        }
        return;
    }
    if depth >= MAX_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if should_skip_dir(&name.to_string_lossy()) {
            continue;
        }
        scan_dir(&entry.path(), base_dir, depth + 1, out);
    }
}

/// What: Stable de-duplication preserving first occurrence.
///
/// Details:
/// - Used to merge MRU entries (placed first) with discovery results so the
///   recently used projects stay at the top without repeats.
#[must_use]
pub fn dedupe(items: Vec<String>) -> Vec<String> {
    if items.len() <= 1 {
        return items;
    }
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// What: Remove the scan cache file; absent cache counts as success.
///
/// # Errors
/// - Returns `Err` when the cache file exists but cannot be removed.
pub fn clear_cache(base_dir: &Path) -> io::Result<()> {
    match fs::remove_file(cache_path(base_dir)) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// What: Report the current cache, when valid.
///
/// Output:
/// - `Some((last_scan, project_count))` for a valid cache, `None` otherwise.
#[must_use]
pub fn cache_info(base_dir: &Path) -> Option<(SystemTime, usize)> {
    let cache = load_cache(base_dir)?;
    Some((cache.last_scan, cache.projects.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mkproj(base: &Path, rel: &str, marker: &str) {
        let dir = base.join(rel);
        fs::create_dir_all(&dir).expect("project dir");
        fs::write(dir.join(marker), "").expect("marker");
    }

    /// What: Discovery finds nested projects and skips noise directories.
    #[test]
    fn scan_finds_projects_and_skips_noise() {
        let root = tempfile::tempdir().expect("tempdir");
        let base = root.path();
        mkproj(base, "alpha", ".git");
        mkproj(base, "group/beta", "Cargo.toml");
        mkproj(base, "node_modules/fake", ".git");
        mkproj(base, ".hidden/secret", ".git");
        // A plain directory without indicators is not a project.
        fs::create_dir_all(base.join("notes")).expect("dir");

        let mut projects = Vec::new();
        scan_dir(base, base, 0, &mut projects);
        projects.sort();
        assert_eq!(projects, vec!["alpha".to_string(), "group/beta".to_string()]);
    }

    /// What: The walk does not descend into a detected project root.
    #[test]
    fn scan_does_not_descend_into_projects() {
        let root = tempfile::tempdir().expect("tempdir");
        let base = root.path();
        mkproj(base, "outer", ".git");
        mkproj(base, "outer/inner", ".git");

        let mut projects = Vec::new();
        scan_dir(base, base, 0, &mut projects);
        assert_eq!(projects, vec!["outer".to_string()]);
    }

    /// What: Dedup keeps the first occurrence and the original order.
    #[test]
    fn dedupe_is_stable() {
        let items = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(
            dedupe(items),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    /// What: Cache round-trips and is invalidated by a version bump.
    #[test]
    fn cache_roundtrip_and_version_check() {
        let root = tempfile::tempdir().expect("tempdir");
        let base = root.path();
        mkproj(base, "alpha", ".git");

        let first = find_projects(base);
        assert_eq!(first, vec!["alpha".to_string()]);
        assert!(cache_path(base).is_file());

        // Served from cache on the second call.
        let (last_scan, count) = cache_info(base).expect("cache info");
        assert!(last_scan <= SystemTime::now());
        assert_eq!(count, 1);
        assert_eq!(find_projects(base), first);

        // A foreign version is rejected.
        let body = fs::read_to_string(cache_path(base)).expect("read cache");
        let mut value: serde_json::Value = serde_json::from_str(&body).expect("json");
        value["cache_version"] = serde_json::json!(999);
        fs::write(
            cache_path(base),
            serde_json::to_string(&value).expect("json"),
        )
        .expect("write cache");
        assert!(cache_info(base).is_none());
    }

    /// What: Clearing an absent cache succeeds.
    #[test]
    fn clear_cache_tolerates_missing_file() {
        let root = tempfile::tempdir().expect("tempdir");
        clear_cache(root.path()).expect("clear");
    }
}
