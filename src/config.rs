//! Launcher settings loaded from a `key = value` config file.
//!
//! The config lives at `~/.config/codepick/codepick.conf`; a commented
//! skeleton is written on first run. Missing or invalid entries fall back to
//! the defaults, so a broken config never prevents a launch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::split_shell_args;
use crate::paths;
use crate::picker::FormatStyle;

/// Commented skeleton written to the config path on first run.
#[allow(clippy::literal_string_with_formatting_args)] // template placeholders, not format args
const SKELETON_CONFIG_CONTENT: &str = r#"# codepick configuration
#
# Lines starting with '#', '//' or ';' are comments. Values may carry an
# inline comment after a '#'.

# Directory scanned for projects and used as the root for relative paths.
# base_dir = ~/Dev

# File holding the most-recently-used project list.
# mru_file = ~/.config/codepick/mru.txt

# External fuzzy picker fed one candidate per line on stdin.
# selector_command = fuzzel
# selector_args = --dmenu "--prompt=Project: "

# Editor launch command. Placeholders: {dir} {title} {name} {session}
# editor_command = kitty
# editor_args = -d {dir} -T "{title}" --class "{title}" sh -c "tmux new -c {dir} -A -s {session} nvim {dir}"

# How candidates are decorated for the picker: plain | prefixed
# format_style = prefixed
# format_prefix = "📘 "
"#;

/// Resolved launcher settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory scanned for projects; root for relative identifiers.
    pub base_dir: PathBuf,
    /// Backing file for the MRU list.
    pub mru_file: PathBuf,
    /// External picker executable.
    pub selector_command: String,
    /// Arguments passed to the picker.
    pub selector_args: Vec<String>,
    /// Editor executable.
    pub editor_command: String,
    /// Editor argument template with `{dir}`/`{title}`/`{name}`/`{session}`
    /// placeholders, split with shell-style quoting.
    pub editor_args: String,
    /// Candidate decoration strategy for the picker.
    pub format_style: FormatStyle,
}

impl Default for Settings {
    #[allow(clippy::literal_string_with_formatting_args)] // template placeholders, not format args
    fn default() -> Self {
        Self {
            base_dir: paths::default_base_dir(),
            mru_file: paths::default_mru_file(),
            selector_command: "fuzzel".to_string(),
            selector_args: vec!["--dmenu".to_string(), "--prompt=Project: ".to_string()],
            editor_command: "kitty".to_string(),
            editor_args: "-d {dir} -T \"{title}\" --class \"{title}\" sh -c \
                          \"tmux new -c {dir} -A -s {session} nvim {dir}\""
                .to_string(),
            format_style: FormatStyle::Prefixed {
                prefix: "📘 ".to_string(),
            },
        }
    }
}

/// What: Check if a line should be skipped (empty or comment).
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Output:
/// - `Some((key, value))` if parsing succeeds, `None` otherwise
///
/// Details:
/// - Splits on the first `=` character and trims whitespace from both sides.
/// - Keys are lowercased with `.`/`-`/spaces folded to `_`.
#[must_use]
pub fn parse_key_value(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if !trimmed.contains('=') {
        return None;
    }
    let mut parts = trimmed.splitn(2, '=');
    let key = parts
        .next()?
        .trim()
        .to_lowercase()
        .replace(['.', '-', ' '], "_");
    let value = parts.next()?.trim().to_string();
    Some((key, value))
}

/// Strip an inline ` # comment` from a value, then surrounding quotes.
fn clean_value(raw: &str) -> String {
    let cut = raw.find(" #").map_or(raw, |i| &raw[..i]);
    let trimmed = cut.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.to_string()
}

/// Expand a leading `~/` to `$HOME`.
fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return Path::new(&home).join(rest);
    }
    PathBuf::from(value)
}

/// What: Load settings from the given path or the default config location.
///
/// Inputs:
/// - `path_override`: Explicit config file (CLI `--config`), if any
///
/// Output:
/// - Settings with every recognized key applied over the defaults.
///
/// Details:
/// - When no override is given and the default file is missing, a commented
///   skeleton is written so users have something to edit.
/// - Unknown keys are ignored; read failures fall back to defaults.
#[must_use]
pub fn settings(path_override: Option<&Path>) -> Settings {
    let path = path_override.map_or_else(
        || {
            let p = paths::config_file();
            if !p.is_file() {
                if let Err(e) = fs::write(&p, SKELETON_CONFIG_CONTENT) {
                    tracing::warn!(path = %p.display(), error = %e, "failed to write skeleton config");
                }
            }
            p
        },
        Path::to_path_buf,
    );

    let mut out = Settings::default();
    let Ok(content) = fs::read_to_string(&path) else {
        return out;
    };
    apply_config(&mut out, &content);
    out
}

/// Apply every recognized `key = value` line of `content` onto `out`.
fn apply_config(out: &mut Settings, content: &str) {
    // Collected separately so style and prefix can arrive in any order.
    let mut style_name: Option<String> = None;
    let mut prefix: Option<String> = None;

    for line in content.lines() {
        if skip_comment_or_empty(line) {
            continue;
        }
        let Some((key, raw)) = parse_key_value(line) else {
            continue;
        };
        let val = clean_value(&raw);
        match key.as_str() {
            "base_dir" => out.base_dir = expand_home(&val),
            "mru_file" => out.mru_file = expand_home(&val),
            "selector_command" => out.selector_command = val,
            "selector_args" => out.selector_args = split_shell_args(&val),
            "editor_command" => out.editor_command = val,
            "editor_args" => out.editor_args = val,
            "format_style" => style_name = Some(val),
            "format_prefix" => prefix = Some(val),
            _ => {}
        }
    }

    if style_name.is_some() || prefix.is_some() {
        out.format_style = FormatStyle::from_config(
            style_name.as_deref().unwrap_or("prefixed"),
            prefix.as_deref().unwrap_or("📘 "),
        );
    }
}
