//! External fuzzy-picker invocation and candidate formatting.
//!
//! Candidates are decorated by a named formatting strategy before being fed
//! to the picker on stdin, and the picker's choice is mapped back to the
//! original identifier. The picker is any dmenu-style program printing the
//! selected line on stdout; exit code 1 means the user cancelled.

use std::io::Write as _;
use std::process::{Command, Stdio};

use crate::config::Settings;

/// Result alias for process-facing operations.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// How candidates are decorated for display in the picker.
#[derive(Debug, Clone)]
pub enum FormatStyle {
    /// Candidates pass through unchanged.
    Plain,
    /// Candidates carry a fixed prefix, stripped again on recovery.
    Prefixed {
        /// Decoration prepended to every candidate.
        prefix: String,
    },
}

impl FormatStyle {
    /// What: Resolve a style by its config name.
    ///
    /// Details:
    /// - Unknown names fall back to `prefixed` so a typo never breaks the
    ///   picker, only its decoration.
    #[must_use]
    pub fn from_config(name: &str, prefix: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "plain" | "none" => Self::Plain,
            _ => Self::Prefixed {
                prefix: prefix.to_string(),
            },
        }
    }

    /// Decorate a candidate for display.
    #[must_use]
    pub fn present(&self, candidate: &str) -> String {
        match self {
            Self::Plain => candidate.to_string(),
            Self::Prefixed { prefix } => format!("{prefix}{candidate}"),
        }
    }

    /// Map a selected display string back to the candidate identifier.
    #[must_use]
    pub fn recover(&self, selected: &str) -> String {
        match self {
            Self::Plain => selected.trim().to_string(),
            Self::Prefixed { prefix } => selected
                .strip_prefix(prefix.as_str())
                .unwrap_or(selected)
                .trim()
                .to_string(),
        }
    }
}

/// What: Run the configured picker over `candidates` and return the choice.
///
/// Output:
/// - `Ok(Some(identifier))` for a selection, `Ok(None)` when the user
///   cancelled (picker exit code 1).
///
/// # Errors
/// - Returns `Err` when the candidate list is empty, the picker binary is
///   missing, it cannot be spawned or fed, or it exits with anything other
///   than 0 or 1.
///
/// Details:
/// - Candidates are decorated with the configured [`FormatStyle`], written
///   one per line to the picker's stdin, and the selected line is recovered
///   back into the identifier.
/// - The picker binary is resolved up front for a clear diagnostic when it
///   is not installed.
pub fn pick(settings: &Settings, candidates: &[String]) -> Result<Option<String>> {
    if candidates.is_empty() {
        return Err("no candidates to pick from".into());
    }

    let program = which::which(&settings.selector_command)
        .map_err(|e| format!("picker '{}' not found: {e}", settings.selector_command))?;

    let mut child = Command::new(program)
        .args(&settings.selector_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        let mut feed = String::new();
        for candidate in candidates {
            feed.push_str(&settings.format_style.present(candidate));
            feed.push('\n');
        }
        // Pickers may stop reading as soon as a choice is made; a broken
        // pipe here is not a failure.
        if let Err(e) = stdin.write_all(feed.as_bytes())
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(e.into());
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        // dmenu-style pickers exit 1 on escape/cancel.
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        return Err(format!("picker exited with {}", output.status).into());
    }

    let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if selected.is_empty() {
        return Ok(None);
    }
    Ok(Some(settings.format_style.recover(&selected)))
}
