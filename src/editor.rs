//! Editor session launching.
//!
//! The editor command line comes from a placeholder template so users can
//! wire up any terminal/multiplexer/editor combination. Supported
//! placeholders: `{dir}` (project directory), `{title}` (window title),
//! `{name}` (directory basename), `{session}` (tmux-safe basename).

use std::path::Path;
use std::process::Command;

use crate::config::Settings;

/// Result alias for process-facing operations.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Window title used for an editor session on `dir`, shared with the Sway
/// window lookup.
#[must_use]
pub fn window_title(dir: &Path) -> String {
    format!("nvim ~ {}", basename(dir))
}

/// Directory basename, falling back to the full path text for roots.
fn basename(dir: &Path) -> String {
    dir.file_name()
        .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// What: Sanitize a string for use as a tmux session name.
///
/// Details:
/// - Everything outside `[A-Za-z0-9_]` becomes an underscore; tmux treats
///   `.` and `:` specially in session names.
#[must_use]
pub fn sanitize_session(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// What: Split a command line into arguments, honoring quotes.
///
/// Details:
/// - Single and double quotes group words; the quote characters themselves
///   are dropped. No escape processing beyond that.
#[must_use]
pub fn split_shell_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == ' ' || c == '\t' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            Some(q) if c == q => quote = None,
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Expand the `{dir}`/`{title}`/`{name}`/`{session}` placeholders.
#[allow(clippy::literal_string_with_formatting_args)] // template placeholders, not format args
fn expand_template(template: &str, dir: &Path, title: &str) -> String {
    let name = basename(dir);
    template
        .replace("{dir}", &dir.display().to_string())
        .replace("{title}", title)
        .replace("{session}", &sanitize_session(&name))
        .replace("{name}", &name)
}

/// What: Build the editor argument vector for `dir` and `title`.
///
/// Details:
/// - Placeholders are expanded before quote-aware splitting, so a quoted
///   `sh -c "..."` body stays one argument.
#[must_use]
pub fn editor_args(settings: &Settings, dir: &Path, title: &str) -> Vec<String> {
    split_shell_args(&expand_template(&settings.editor_args, dir, title))
}

/// What: Spawn the configured editor for `dir`, detached.
///
/// # Errors
/// - Returns `Err` when the editor binary is missing or the spawn fails;
///   the child is not waited on.
pub fn launch(settings: &Settings, dir: &Path, title: &str) -> Result<()> {
    let program = which::which(&settings.editor_command)
        .map_err(|e| format!("editor '{}' not found: {e}", settings.editor_command))?;
    let args = editor_args(settings, dir, title);
    tracing::debug!(program = %program.display(), ?args, "launching editor");
    Command::new(program).args(args).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// What: Quoted segments survive splitting as single arguments.
    #[test]
    fn split_shell_args_honors_quotes() {
        assert_eq!(
            split_shell_args("-d /tmp/x sh -c \"tmux new -A\""),
            vec![
                "-d".to_string(),
                "/tmp/x".to_string(),
                "sh".to_string(),
                "-c".to_string(),
                "tmux new -A".to_string()
            ]
        );
        assert_eq!(
            split_shell_args("a 'b c' d"),
            vec!["a".to_string(), "b c".to_string(), "d".to_string()]
        );
        assert!(split_shell_args("   ").is_empty());
    }

    /// What: Session names collapse to tmux-safe characters.
    #[test]
    fn sanitize_session_replaces_specials() {
        assert_eq!(sanitize_session("my-proj.rs"), "my_proj_rs");
        assert_eq!(sanitize_session("plain_01"), "plain_01");
    }

    /// What: The default template expands into the expected kitty invocation.
    #[test]
    fn default_template_expands_placeholders() {
        let settings = Settings::default();
        let dir = PathBuf::from("/home/me/dev/my-proj");
        let title = window_title(&dir);
        assert_eq!(title, "nvim ~ my-proj");

        let args = editor_args(&settings, &dir, &title);
        assert_eq!(
            args,
            vec![
                "-d".to_string(),
                "/home/me/dev/my-proj".to_string(),
                "-T".to_string(),
                "nvim ~ my-proj".to_string(),
                "--class".to_string(),
                "nvim ~ my-proj".to_string(),
                "sh".to_string(),
                "-c".to_string(),
                "tmux new -c /home/me/dev/my-proj -A -s my_proj nvim /home/me/dev/my-proj"
                    .to_string(),
            ]
        );
    }
}
