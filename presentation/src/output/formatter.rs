//! Output formatter trait

use tally_domain::{FetchReport, OutputFormat};

/// Trait for formatting fetch reports
pub trait ReportFormatter {
    /// The count alone
    fn format_count(&self, report: &FetchReport) -> String;

    /// Per-relay breakdown plus the total
    fn format_full(&self, report: &FetchReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &FetchReport) -> String;

    /// Dispatch on the configured output format
    fn render(&self, report: &FetchReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Count => self.format_count(report),
            OutputFormat::Full => self.format_full(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
