//! In-place progress line for file fingerprinting.

use super::{Verbosity, get_verbosity};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Minimum time between two redraws.
const REDRAW_INTERVAL: Duration = Duration::from_millis(80);

/// File counter redrawn on one stderr line, e.g. `Fingerprinting files: 40% (4/10)`.
///
/// Drawing is disabled when stderr is not a terminal, in quiet mode, or when there is
/// nothing to count. The state is tracked either way.
pub struct Progress {
    /// Text before the counter
    label: String,
    /// Number of items to process
    total: usize,
    /// Number of items processed
    done: usize,
    /// Whether anything is drawn
    enabled: bool,
    /// When the line was last drawn
    drawn_at: Option<Instant>,
    /// Set once the final line is out
    closed: bool,
}

impl Progress {
    /// Creates a counter for `total` items.
    #[must_use]
    pub fn new(label: &str, total: usize) -> Self {
        let enabled =
            total > 0 && get_verbosity() != Verbosity::Quiet && io::stderr().is_terminal();

        let mut progress = Self {
            label: label.to_string(),
            total,
            done: 0,
            enabled,
            drawn_at: None,
            closed: false,
        };
        progress.redraw(true);
        progress
    }

    /// Items completed so far.
    #[must_use]
    pub fn done(&self) -> usize {
        self.done
    }

    /// Completion in whole percent.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.done * 100 / self.total
        }
    }

    /// Records that `done` items are complete (clamped to the total).
    pub fn update(&mut self, done: usize) {
        self.done = done.min(self.total);
        self.redraw(self.done == self.total);
    }

    /// Marks every item complete and ends the line.
    pub fn finish(mut self) {
        self.done = self.total;
        self.closed = true;
        if self.enabled {
            eprintln!(
                "\r{}: 100% ({}/{}), done.",
                self.label.dimmed(),
                self.total,
                self.total
            );
        }
    }

    /// Draws the line if forced or if the last draw is old enough.
    fn redraw(&mut self, force: bool) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        let due = self
            .drawn_at
            .is_none_or(|at| now.duration_since(at) >= REDRAW_INTERVAL);
        if !(force || due) {
            return;
        }

        self.drawn_at = Some(now);
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\r{}: {}% ({}/{})",
            self.label.dimmed(),
            self.percent(),
            self.done,
            self.total
        );
        let _ = stderr.flush();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        // Leave the cursor on a fresh line if the scan stopped early
        if self.enabled && !self.closed {
            eprintln!();
        }
    }
}
