//! Presentation layer for relay-tally
//!
//! This crate contains CLI definitions, output formatters, the live count
//! display and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::ReportFormatter;
pub use output::live::{LatestCount, LiveCountDisplay};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
