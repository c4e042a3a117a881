//! Console output formatter for fetch reports

use crate::output::formatter::ReportFormatter;
use colored::{ColoredString, Colorize};
use tally_domain::{DoneReason, EndpointReport, FetchReport};

/// Formats fetch reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Group digits in threes with `,` (en-US style): `1234567` -> `1,234,567`
    pub fn group_digits(n: usize) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// The last published count alone; empty when nothing was published
    pub fn format_count(report: &FetchReport) -> String {
        report.published.map(Self::group_digits).unwrap_or_default()
    }

    /// Per-relay breakdown followed by the total
    pub fn format_full(report: &FetchReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Subject:".cyan().bold(),
            report.subject
        ));
        output.push_str(&format!("{} {}\n\n", "Label:".cyan().bold(), report.label));

        if report.endpoints.is_empty() {
            output.push_str(&format!("{}\n", "No relays configured.".yellow()));
        } else {
            let width = report
                .endpoints
                .iter()
                .map(|e| e.endpoint.as_str().len())
                .max()
                .unwrap_or(0)
                .max("RELAY".len());

            output.push_str(&format!(
                "{:<width$}  {:<16}  {:>6}  {:>6}\n",
                "RELAY", "OUTCOME", "EVENTS", "NEW"
            ));
            output.push_str(&format!("{}\n", "-".repeat(width + 36)));

            for endpoint in &report.endpoints {
                output.push_str(&Self::endpoint_line(endpoint, width));
            }
        }

        let total = match report.published {
            Some(count) => Self::group_digits(count).bold(),
            None => "not published (no relay returned a follower)".dimmed(),
        };
        output.push_str(&format!(
            "\n{} {} ({}/{} relays complete)\n",
            "Followers:".green().bold(),
            total,
            report.completed(),
            report.endpoints.len()
        ));

        output
    }

    /// Format as JSON
    pub fn format_json(report: &FetchReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn endpoint_line(endpoint: &EndpointReport, width: usize) -> String {
        // Pad before colouring so escape codes do not break alignment
        let outcome = format!(
            "{:<16}",
            endpoint.outcome.as_ref().map_or("pending", DoneReason::as_str)
        );
        let mut line = format!(
            "{:<width$}  {}  {:>6}  {:>6}",
            endpoint.endpoint.as_str(),
            Self::colour_outcome(endpoint.outcome, outcome),
            endpoint.events,
            endpoint.contributed,
        );
        if let Some(detail) = &endpoint.detail {
            line.push_str(&format!("  {}", detail.dimmed()));
        }
        line.push('\n');
        line
    }

    fn colour_outcome(outcome: Option<DoneReason>, text: String) -> ColoredString {
        match outcome {
            Some(reason) if reason.is_complete() => text.green(),
            Some(DoneReason::TimedOut) => text.yellow(),
            Some(_) => text.red(),
            None => text.dimmed(),
        }
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_count(&self, report: &FetchReport) -> String {
        Self::format_count(report)
    }

    fn format_full(&self, report: &FetchReport) -> String {
        Self::format_full(report)
    }

    fn format_json(&self, report: &FetchReport) -> String {
        Self::format_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::Endpoint;

    fn report() -> FetchReport {
        let mut report = FetchReport::empty("abc", "followers");
        report.count = 1234;
        report.published = Some(1234);
        report.endpoints = vec![
            EndpointReport {
                endpoint: Endpoint::new("wss://relay.damus.io"),
                outcome: Some(DoneReason::EndOfStoredEvents),
                events: 1300,
                contributed: 1200,
                detail: None,
            },
            EndpointReport {
                endpoint: Endpoint::new("wss://nos.lol"),
                outcome: Some(DoneReason::ConnectFailed),
                events: 0,
                contributed: 0,
                detail: Some("refused".into()),
            },
        ];
        report
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(ConsoleFormatter::group_digits(0), "0");
        assert_eq!(ConsoleFormatter::group_digits(999), "999");
        assert_eq!(ConsoleFormatter::group_digits(1000), "1,000");
        assert_eq!(ConsoleFormatter::group_digits(123456), "123,456");
        assert_eq!(ConsoleFormatter::group_digits(1234567), "1,234,567");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(ConsoleFormatter::format_count(&report()), "1,234");
    }

    #[test]
    fn test_format_full_lists_every_relay() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_full(&report());
        assert!(text.contains("wss://relay.damus.io"));
        assert!(text.contains("eose"));
        assert!(text.contains("connect failed"));
        assert!(text.contains("refused"));
        assert!(text.contains("1,234"));
        assert!(text.contains("(1/2 relays complete)"));
    }

    #[test]
    fn test_unpublished_count_renders_nothing() {
        let report = FetchReport::empty("abc", "followers");
        assert_eq!(ConsoleFormatter::format_count(&report), "");
    }

    #[test]
    fn test_unpublished_full_footer_shows_no_zero() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_full(&FetchReport::empty("abc", "followers"));
        assert!(text.contains("Followers: not published"));
        assert!(!text.contains("Followers: 0"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        use tally_domain::OutputFormat;
        let formatter = ConsoleFormatter;
        assert_eq!(formatter.render(&report(), OutputFormat::Count), "1,234");
        assert!(formatter.render(&report(), OutputFormat::Json).starts_with('{'));
    }

    #[test]
    fn test_format_json_round_trips() {
        let json = ConsoleFormatter::format_json(&report());
        let back: FetchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report());
    }
}
