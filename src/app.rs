//! Launch orchestration: gather candidates, pick, focus or spawn the editor.
//!
//! The hot path runs under a two second budget. MRU loading and project
//! discovery run concurrently, the merged list is handed to the picker, and
//! after a selection the window focus/launch and the MRU update again run
//! side by side. MRU persistence is best-effort relative to the launch: a
//! failed write only produces a warning.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep, timeout};

use crate::args::Args;
use crate::config::{self, Settings};
use crate::editor;
use crate::mru::MruList;
use crate::picker;
use crate::project;
use crate::util::{ts_to_date, unix_secs};
use crate::window;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Overall budget for candidate gathering.
const GATHER_BUDGET: Duration = Duration::from_secs(2);
/// Budget for the pre-launch window lookup; past this we just launch.
const WINDOW_LOOKUP_BUDGET: Duration = Duration::from_millis(100);
/// Budget for waiting on a freshly launched window to appear.
const WINDOW_WAIT_BUDGET: Duration = Duration::from_secs(2);
/// First wait-for-window backoff step; doubled per attempt.
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);
/// Wait-for-window backoff ceiling.
const MAX_BACKOFF: Duration = Duration::from_secs(1);
/// Interval of the deferred MRU flush task.
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// What: Run the launcher end to end for the parsed CLI arguments.
///
/// Details:
/// - Maintenance flags (`--clear-cache`, `--cache-info`, `--prune`,
///   `--clear-mru`) short-circuit before any picker is shown.
/// - Picker cancellation exits quietly with success.
///
/// # Errors
/// - Returns `Err` when maintenance operations fail, no candidates exist,
///   the picker errors out, the selection is not a directory, or the editor
///   window can neither be focused nor launched.
#[allow(clippy::too_many_lines)]
pub async fn run(args: &Args) -> Result<()> {
    let mut settings = config::settings(args.config.as_deref().map(Path::new));
    if let Some(dir) = &args.base_dir {
        settings.base_dir = PathBuf::from(dir);
    }

    if args.clear_cache {
        project::clear_cache(&settings.base_dir)?;
        println!("Cache cleared for {}", settings.base_dir.display());
        return Ok(());
    }
    if args.cache_info {
        print_cache_info(&settings.base_dir);
        return Ok(());
    }

    let mru = Arc::new(MruList::open(&settings.mru_file, &settings.base_dir));

    if args.clear_mru {
        mru.clear()?;
        println!("MRU list cleared");
        return Ok(());
    }
    if let Some(path) = &args.forget {
        if mru.contains(path) {
            mru.remove(path)?;
            println!("Removed {path} from the MRU list");
        } else {
            println!("{path} is not in the MRU list");
        }
        return Ok(());
    }
    if args.prune {
        if mru.is_empty() {
            println!("MRU list is empty");
            return Ok(());
        }
        let before = mru.len();
        mru.cleanup()?;
        println!("Pruned {} stale MRU entries", before - mru.len());
        return Ok(());
    }

    Arc::clone(&mru).start_autoflush(FLUSH_INTERVAL);

    let candidates = match gather_candidates(&settings, &mru).await {
        Ok(candidates) => candidates,
        Err(e) => {
            close_store(&mru);
            return Err(e);
        }
    };
    if candidates.is_empty() {
        close_store(&mru);
        return Err(format!("no projects found in {}", settings.base_dir.display()).into());
    }

    if args.list {
        for candidate in &candidates {
            println!("{candidate}");
        }
        close_store(&mru);
        return Ok(());
    }

    let picked = {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || picker::pick(&settings, &candidates)).await
    };
    let picked = match picked {
        Ok(Ok(picked)) => picked,
        Ok(Err(e)) => {
            close_store(&mru);
            return Err(e);
        }
        Err(e) => {
            close_store(&mru);
            return Err(e.into());
        }
    };
    let Some(selected) = picked else {
        tracing::info!("selection cancelled");
        close_store(&mru);
        return Ok(());
    };

    let full_path = crate::mru::normalize(&selected, &settings.base_dir);
    if !full_path.is_dir() {
        close_store(&mru);
        return Err(format!("not a directory: {}", full_path.display()).into());
    }
    let title = editor::window_title(&full_path);

    if args.dry_run {
        println!("would open {} ({title})", full_path.display());
        close_store(&mru);
        return Ok(());
    }

    // Window handling and MRU persistence proceed concurrently; only the
    // window side can fail the launch.
    let window_task =
        tokio::spawn(async move { focus_or_launch(&settings, &full_path, &title).await });
    let mru_task = {
        let mru = Arc::clone(&mru);
        tokio::task::spawn_blocking(move || mru.update(&selected))
    };

    let (window_res, mru_res) = tokio::join!(window_task, mru_task);
    match mru_res {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to persist MRU update");
            eprintln!("Warning: failed to update MRU list: {e}");
        }
        Err(e) => tracing::warn!(error = %e, "MRU update task failed"),
    }
    match window_res {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            close_store(&mru);
            return Err(format!("failed to launch or focus window: {e}").into());
        }
        Err(e) => {
            close_store(&mru);
            return Err(e.into());
        }
    }

    close_store(&mru);
    Ok(())
}

/// Cancel the deferred flush task and write any dirty state; a failed final
/// flush only warns so it never masks the outcome of the launch itself.
fn close_store(mru: &MruList) {
    if let Err(e) = mru.close() {
        tracing::warn!(error = %e, "final MRU flush failed");
    }
}

/// What: Load MRU entries and discover projects concurrently, then merge.
///
/// Output:
/// - MRU entries first (recency bias), discovery results after, stably
///   deduplicated.
///
/// Details:
/// - Both loads are blocking filesystem work and run on the blocking pool
///   under the overall gather budget.
async fn gather_candidates(settings: &Settings, mru: &Arc<MruList>) -> Result<Vec<String>> {
    let discovery = {
        let base = settings.base_dir.clone();
        tokio::task::spawn_blocking(move || project::find_projects(&base))
    };
    let recents = {
        let mru = Arc::clone(mru);
        tokio::task::spawn_blocking(move || mru.items())
    };

    let joined = timeout(GATHER_BUDGET, async { tokio::join!(recents, discovery) }).await;
    let (recent, found) = match joined {
        Ok((Ok(recent), Ok(found))) => (recent, found),
        Ok(_) => return Err("candidate gathering task failed".into()),
        Err(_) => {
            return Err(format!(
                "timeout gathering projects from {}",
                settings.base_dir.display()
            )
            .into());
        }
    };

    let mut merged = recent;
    merged.extend(found);
    Ok(project::dedupe(merged))
}

/// What: Focus an existing editor window or launch a fresh one.
///
/// Details:
/// - The pre-launch lookup is bounded; a slow or failing compositor query
///   degrades to launching a new window.
/// - A focus failure also falls back to launching.
/// - After launching, the window is awaited with exponential backoff and
///   focused on arrival; not seeing it in time is logged, never fatal.
async fn focus_or_launch(settings: &Settings, dir: &Path, title: &str) -> Result<()> {
    let existing = {
        let title = title.to_string();
        timeout(
            WINDOW_LOOKUP_BUDGET,
            tokio::task::spawn_blocking(move || window::find_window(&title)),
        )
        .await
    };

    let existing_id = match existing {
        Ok(Ok(Ok(id))) => id,
        Ok(Ok(Err(e))) => {
            tracing::debug!(error = %e, "window lookup failed");
            None
        }
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "window lookup task failed");
            None
        }
        Err(_) => {
            tracing::debug!("window lookup timed out");
            None
        }
    };

    if let Some(id) = existing_id {
        match window::focus_window(id) {
            Ok(()) => {
                tracing::info!(con_id = id, title, "focused existing window");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, con_id = id, "focus failed; launching instead");
            }
        }
    }

    editor::launch(settings, dir, title)?;
    if let Some(id) = wait_for_window(title, WINDOW_WAIT_BUDGET).await {
        if let Err(e) = window::focus_window(id) {
            tracing::debug!(error = %e, con_id = id, "could not focus new window");
        }
    } else {
        tracing::debug!(title, "window did not appear within budget");
    }
    Ok(())
}

/// Poll for a window with the given title, backing off exponentially up to
/// the budget. Returns its container id when it appears.
async fn wait_for_window(title: &str, budget: Duration) -> Option<i64> {
    let deadline = Instant::now() + budget;
    let mut backoff = INITIAL_BACKOFF;
    while Instant::now() < deadline {
        sleep(backoff.min(deadline.saturating_duration_since(Instant::now()))).await;
        let lookup = {
            let title = title.to_string();
            tokio::task::spawn_blocking(move || window::find_window(&title)).await
        };
        if let Ok(Ok(Some(id))) = lookup {
            return Some(id);
        }
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
    None
}

/// Print the `--cache-info` report for `base_dir`.
fn print_cache_info(base_dir: &Path) {
    project::cache_info(base_dir).map_or_else(
        || println!("No valid cache for {}", base_dir.display()),
        |(last_scan, count)| {
            let age = last_scan.elapsed().map_or_else(
                |_| "in the future".to_string(),
                |d| format!("{}s ago", d.as_secs()),
            );
            println!("Cache information:");
            println!("  Base directory: {}", base_dir.display());
            println!("  Last scan: {} ({age})", ts_to_date(unix_secs(last_scan)));
            println!("  Projects: {count}");
        },
    );
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    /// What: An error exit after the store is opened still flushes a list
    /// that was dirtied by the self-healing load.
    ///
    /// Inputs:
    /// - MRU file seeded with a duplicated valid path; a picker binary that
    ///   does not exist, so the run fails after candidate gathering.
    ///
    /// Output:
    /// - `run` returns the picker error and the backing file is rewritten
    ///   with the duplicate removed.
    #[tokio::test(flavor = "multi_thread")]
    async fn failed_run_still_flushes_cleaned_mru() {
        let root = tempfile::tempdir().expect("tempdir");
        let base = root.path().join("dev");
        std::fs::create_dir_all(base.join("proj")).expect("project dir");
        let mru_file = root.path().join("mru.txt");
        let entry = base.join("proj").display().to_string();
        std::fs::write(&mru_file, format!("{entry}\n{entry}\n")).expect("seed file");

        let conf = root.path().join("codepick.conf");
        std::fs::write(
            &conf,
            format!(
                "base_dir = {}\nmru_file = {}\nselector_command = codepick-no-such-picker\n",
                base.display(),
                mru_file.display()
            ),
        )
        .expect("conf");

        let args = crate::args::Args::parse_from([
            "codepick",
            "--config",
            conf.to_string_lossy().as_ref(),
        ]);
        assert!(super::run(&args).await.is_err());

        let body = std::fs::read_to_string(&mru_file).expect("read back");
        assert_eq!(body.trim(), entry);
        assert_eq!(body.matches("proj").count(), 1);
    }
}
