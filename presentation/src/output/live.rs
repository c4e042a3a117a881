//! Live count display
//!
//! The terminal counterpart of a single overwritable text field: every
//! publish replaces what was shown before.

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use tally_application::CountSink;

/// Shared handle to the most recently published count.
#[derive(Debug, Clone, Default)]
pub struct LatestCount(Arc<Mutex<Option<usize>>>);

impl LatestCount {
    /// `None` until the first publish
    pub fn get(&self) -> Option<usize> {
        self.0.lock().map(|v| *v).unwrap_or(None)
    }

    fn set(&self, count: usize) {
        if let Ok(mut v) = self.0.lock() {
            *v = Some(count);
        }
    }
}

/// [`CountSink`] that keeps the latest value and redraws one terminal line.
pub struct LiveCountDisplay {
    latest: LatestCount,
    line: ProgressBar,
}

impl LiveCountDisplay {
    /// Draw as one line of an existing multi-progress display
    pub fn attached(multi: &MultiProgress) -> Self {
        Self::with_bar(multi.add(ProgressBar::new_spinner()))
    }

    /// Record counts without drawing anything (quiet mode)
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(line: ProgressBar) -> Self {
        line.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            latest: LatestCount::default(),
            line,
        }
    }

    pub fn latest(&self) -> LatestCount {
        self.latest.clone()
    }

    /// Remove the live line from the terminal
    pub fn clear(&self) {
        self.line.finish_and_clear();
    }
}

impl CountSink for LiveCountDisplay {
    fn publish(&self, count: usize) {
        self.latest.set(count);
        self.line.set_message(format!(
            "{} {}",
            "Followers:".green().bold(),
            ConsoleFormatter::group_digits(count).bold()
        ));
        self.line.tick();
    }
}
