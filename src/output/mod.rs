//! Styled terminal output for fim.
//!
//! Status lines (success, info, warnings, errors) go to stderr and respect the global
//! verbosity; reports meant for piping (bucket listings, summaries) are printed to
//! stdout by the commands themselves.

mod progress;

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

pub use progress::Progress;

/// Width of the report separator lines.
pub const RULE_WIDTH: usize = 60;

/// How much status output to print, from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet = 0,
    /// Progress and status lines
    Normal = 1,
    /// Per-run detail such as resolved paths
    Verbose = 2,
}

impl Verbosity {
    /// Level selected by the `--quiet` / `--verbose` flags; quiet wins.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// Sets the process-wide verbosity.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Current process-wide verbosity.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Whether messages that need at least `level` are printed.
fn shown(level: Verbosity) -> bool {
    get_verbosity() >= level
}

/// `✓ message` in green.
pub fn success(message: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{} {message}", "✓".green().bold());
    }
}

/// `Error: message`, always printed.
pub fn error(message: &str) {
    eprintln!("{} {message}", "Error:".red().bold());
}

/// `warning: message`, always printed.
pub fn warning(message: &str) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}

/// Dimmed status line.
pub fn info(message: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{}", message.dimmed());
    }
}

/// Dimmed detail line, verbose mode only.
pub fn verbose(message: &str) {
    if shown(Verbosity::Verbose) {
        eprintln!("{}", message.dimmed());
    }
}

/// `Verb target`, e.g. `Initializing /etc`.
pub fn action(verb: &str, target: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{} {target}", verb.cyan().bold());
    }
}

/// Separator line of `ch` for report sections.
#[must_use]
pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// Progress counter for a long-running step.
#[must_use]
pub fn start_progress(label: &str, total: usize) -> Progress {
    Progress::new(label, total)
}
