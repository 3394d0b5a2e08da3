//! Command-line argument parsing and handling.

use clap::Parser;

/// codepick - a fast project launcher for development directories
#[derive(Parser, Debug)]
#[command(name = "codepick")]
#[command(version)]
#[command(
    about = "Pick a development project with a fuzzy picker and open it in an editor session",
    long_about = "codepick discovers projects under a base directory, biases the list by \
                  recent use, offers it through an external fuzzy picker and opens the \
                  chosen project in an editor session, reusing an existing window when \
                  one is already open."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Base directory to scan for projects (default: the configured one)
    pub base_dir: Option<String>,

    /// Config file (default: ~/.config/codepick/codepick.conf)
    #[arg(long)]
    pub config: Option<String>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the merged candidate list without launching anything
    #[arg(short, long)]
    pub list: bool,

    /// Clear the project scan cache and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Show project scan cache information and exit
    #[arg(long)]
    pub cache_info: bool,

    /// Drop MRU entries whose directories no longer exist and exit
    #[arg(long)]
    pub prune: bool,

    /// Remove a single project from the MRU list and exit
    #[arg(long, value_name = "PATH")]
    pub forget: Option<String>,

    /// Empty the MRU list and exit
    #[arg(long)]
    pub clear_mru: bool,

    /// Resolve the selection but do not spawn or focus anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Effective log level, honoring `--verbose`.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        if self.verbose { "debug" } else { &self.log_level }
    }
}
