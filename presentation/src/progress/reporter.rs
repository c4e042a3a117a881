//! Progress reporting for a fetch

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tally_application::FetchProgressNotifier;
use tally_domain::{DoneReason, Endpoint, FetchReport};

/// Reports progress with a bar that ticks once per finished relay
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    /// The display other live lines should attach to
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn outcome_mark(reason: DoneReason) -> String {
        if reason.is_complete() {
            "v".green().to_string()
        } else if reason == DoneReason::TimedOut {
            "~".yellow().to_string()
        } else {
            "x".red().to_string()
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchProgressNotifier for ProgressReporter {
    fn on_fetch_start(&self, _subject: &str, endpoints: &[Endpoint]) {
        let bar = self.multi.add(ProgressBar::new(endpoints.len() as u64));
        bar.set_style(Self::bar_style());
        bar.set_prefix("Relays");
        bar.set_message("Connecting...");

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_endpoint_opened(&self, endpoint: &Endpoint) {
        self.with_bar(|bar| bar.set_message(format!("{} {}", "->".cyan(), endpoint)));
    }

    fn on_endpoint_done(&self, endpoint: &Endpoint, reason: DoneReason) {
        self.with_bar(|bar| {
            bar.set_message(format!("{} {} ({})", Self::outcome_mark(reason), endpoint, reason));
            bar.inc(1);
        });
    }

    fn on_fetch_complete(&self, report: &FetchReport) {
        let taken = self.bar.lock().ok().and_then(|mut slot| slot.take());
        if let Some(bar) = taken {
            bar.finish_with_message(format!(
                "{} ({} complete, {} failed)",
                "done".green(),
                report.completed(),
                report.failed()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl FetchProgressNotifier for SimpleProgress {
    fn on_fetch_start(&self, subject: &str, endpoints: &[Endpoint]) {
        eprintln!(
            "{} {} ({} relays)",
            "->".cyan(),
            subject.bold(),
            endpoints.len()
        );
    }

    fn on_endpoint_done(&self, endpoint: &Endpoint, reason: DoneReason) {
        eprintln!("  {} {} ({})", ProgressReporter::outcome_mark(reason), endpoint, reason);
    }

    fn on_count_published(&self, count: usize) {
        eprintln!("  {} {}", "=".dimmed(), count);
    }

    fn on_fetch_complete(&self, _report: &FetchReport) {
        eprintln!();
    }
}
