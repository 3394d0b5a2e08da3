//! Filesystem locations for configuration, logs and state.
//!
//! Everything lives under the user's config directory
//! (`$HOME/.config/codepick`, falling back to `$XDG_CONFIG_HOME`), created on
//! first access.

use std::env;
use std::path::{Path, PathBuf};

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Return `$HOME/.config/codepick`, ensuring it exists.
///
/// Output: `Some(PathBuf)` when HOME is set and the directory can be created;
/// `None` otherwise.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join("codepick");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    None
}

/// Config directory for codepick (ensured to exist).
#[must_use]
pub fn config_dir() -> PathBuf {
    // Prefer HOME ~/.config/codepick first
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    // Fallback: use XDG_CONFIG_HOME (or default to ~/.config) and ensure
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("codepick");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: `$HOME/.config/codepick/logs` (ensured to exist).
#[must_use]
pub fn logs_dir() -> PathBuf {
    let base = config_dir();
    let dir = base.join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Default development directory scanned for projects: `$HOME/Dev`.
#[must_use]
pub fn default_base_dir() -> PathBuf {
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join("Dev")
}

/// Default MRU file location under the config directory.
#[must_use]
pub fn default_mru_file() -> PathBuf {
    config_dir().join("mru.txt")
}

/// Configuration file path: `$HOME/.config/codepick/codepick.conf`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("codepick.conf")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// What: XDG fallback resolves to `$HOME` segments when the variable is unset.
    #[test]
    fn xdg_base_dir_falls_back_to_home_segments() {
        let var = "CODEPICK_TEST_UNSET_XDG_VAR";
        unsafe { std::env::remove_var(var) };
        let got = xdg_base_dir(var, &[".config"]);
        assert!(got.ends_with(".config"));
    }

    /// What: Default base dir lives under HOME.
    #[test]
    fn default_base_dir_is_under_home() {
        let got = default_base_dir();
        assert!(got.ends_with("Dev"));
    }
}
