//! codepick binary entrypoint kept minimal. The full flow lives in `app`.

mod app;
mod args;
mod config;
mod editor;
mod mru;
mod paths;
mod picker;
mod project;
mod util;
mod window;

use std::sync::OnceLock;
use std::{fmt, time::SystemTime};

use clap::Parser;

/// Timestamp formatter for log lines (`YYYY-MM-DD-THH:MM:SS`).
struct CodepickTimer;

impl tracing_subscriber::fmt::time::FormatTime for CodepickTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let secs = match SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_secs()).unwrap_or(0),
            Err(_) => 0,
        };
        let s = crate::util::ts_to_date(Some(secs)); // "YYYY-MM-DD HH:MM:SS"
        let ts = s.replacen(' ', "-T", 1); // "YYYY-MM-DD-THH:MM:SS"
        w.write_str(&ts)
    }
}

/// Keeps the non-blocking log writer alive for the process lifetime.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initialize tracing, writing to `~/.config/codepick/logs/codepick.log`
/// with a stderr fallback when the file cannot be opened.
fn init_logging(level: &str) {
    let env_filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default.to_string()))
    };

    let mut log_path = crate::paths::logs_dir();
    log_path.push("codepick.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(CodepickTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::debug!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(level))
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(CodepickTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let parsed = args::Args::parse();
    init_logging(parsed.effective_log_level());

    tracing::debug!(dry_run = parsed.dry_run, "codepick starting");
    if let Err(err) = app::run(&parsed).await {
        tracing::error!(error = %err, "launch failed");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
