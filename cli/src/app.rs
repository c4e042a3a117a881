//! Application state for one run of the binary
//!
//! Everything a fetch needs is built once here from the merged
//! configuration and the command line, then handed to the use case.

use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tally_application::{
    CountSink, FetchCountInput, FetchCountUseCase, FetchLogger, FetchProgressNotifier, NoProgress,
};
use tally_domain::{ConfigIssue, FetchReport, OutputFormat};
use tally_infrastructure::{ConfigLoader, FileConfig, JsonlFetchLogger, WsRelayConnector};
use tally_presentation::{
    Cli, ConsoleFormatter, LatestCount, LiveCountDisplay, ProgressReporter, ReportFormatter,
    SimpleProgress,
};
use tracing::{error, info, warn};

pub struct App {
    config: FileConfig,
    format: OutputFormat,
    display: Arc<LiveCountDisplay>,
    progress: Box<dyn FetchProgressNotifier>,
    logger: Option<Arc<JsonlFetchLogger>>,
}

impl App {
    /// Load configuration, apply CLI overrides, validate, and build the
    /// sink, progress and logger handles.
    pub fn init(cli: &Cli) -> Result<Self> {
        let mut config = if cli.no_config {
            ConfigLoader::load_defaults()
        } else {
            ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
        };
        Self::apply_overrides(&mut config, cli);
        Self::check(&config.validate())?;

        if !config.output.color {
            colored::control::set_override(false);
        }

        // Plain progress already prints each published count on its own line
        let (display, progress): (LiveCountDisplay, Box<dyn FetchProgressNotifier>) = if cli.quiet
        {
            (LiveCountDisplay::hidden(), Box::new(NoProgress))
        } else if cli.plain {
            (LiveCountDisplay::hidden(), Box::new(SimpleProgress))
        } else {
            let reporter = ProgressReporter::new();
            (LiveCountDisplay::attached(reporter.multi()), Box::new(reporter))
        };

        let logger = config
            .output
            .event_log
            .as_ref()
            .and_then(JsonlFetchLogger::new)
            .map(Arc::new);
        if let Some(logger) = &logger {
            info!("Writing fetch transcript to {}", logger.path().display());
        }

        Ok(Self {
            format: config.output.format.unwrap_or_default(),
            config,
            display: Arc::new(display),
            progress,
            logger,
        })
    }

    /// Command-line flags win over every configuration source.
    pub fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
        if let Some(subject) = &cli.subject {
            config.query.subject = Some(subject.clone());
        }
        if let Some(label) = &cli.label {
            config.query.label = label.clone();
        }
        if !cli.kinds.is_empty() {
            config.query.kinds = cli.kinds.clone();
        }
        if !cli.relays.is_empty() {
            config.relays.urls = cli.relays.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.fetch.timeout_secs = timeout;
        }
        if let Some(format) = cli.output {
            config.output.format = Some(format.into());
        }
        if let Some(path) = &cli.event_log {
            config.output.event_log = Some(path.clone());
        }
    }

    fn check(issues: &[ConfigIssue]) -> Result<()> {
        for issue in issues {
            if issue.is_error() {
                error!("{}", issue.message);
            } else {
                warn!("{}", issue.message);
            }
        }
        if let Some(issue) = issues.iter().find(|i| i.is_error()) {
            bail!("invalid configuration: {}", issue.message);
        }
        Ok(())
    }

    pub fn latest_count(&self) -> LatestCount {
        self.display.latest()
    }

    /// Build the use-case input from the resolved configuration
    pub fn input(&self) -> Result<FetchCountInput> {
        let Some(subject) = &self.config.query.subject else {
            bail!("No subject given. Pass a public key or set query.subject in the config file.");
        };
        Ok(FetchCountInput::new(subject.clone(), self.config.endpoints())?
            .with_params(self.config.fetch_params()))
    }

    /// Run the fetch against real relays
    pub async fn run(&self) -> Result<FetchReport> {
        let input = self.input()?;

        let mut use_case = FetchCountUseCase::new(Arc::new(WsRelayConnector::new()))
            .with_sink(self.display.clone() as Arc<dyn CountSink>);
        if let Some(logger) = &self.logger {
            use_case = use_case.with_logger(logger.clone() as Arc<dyn FetchLogger>);
        }

        Ok(use_case
            .execute_with_progress(input, self.progress.as_ref())
            .await)
    }

    /// Final output for stdout; empty in count mode when nothing was published
    pub fn render(&self, report: &FetchReport) -> String {
        ConsoleFormatter.render(report, self.format)
    }

    /// Clear the live line and flush the transcript
    pub fn teardown(self) {
        self.display.clear();
        drop(self.logger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("relay-tally").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = FileConfig::default();
        App::apply_overrides(
            &mut config,
            &cli(&["-r", "wss://x.example", "--timeout", "3", "--label", "fc", "-o", "full", "abc"]),
        );

        assert_eq!(config.query.subject.as_deref(), Some("abc"));
        assert_eq!(config.relays.urls, vec!["wss://x.example"]);
        assert_eq!(config.fetch_params().timeout, Duration::from_secs(3));
        assert_eq!(config.query.label, "fc");
        assert_eq!(config.output.format, Some(OutputFormat::Full));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = FileConfig::default();
        config.query.subject = Some("from-file".into());
        App::apply_overrides(&mut config, &cli(&[]));
        assert_eq!(config, {
            let mut expected = FileConfig::default();
            expected.query.subject = Some("from-file".into());
            expected
        });
    }

    #[test]
    fn test_init_requires_subject_for_input() {
        let app = App::init(&cli(&["--no-config", "-q"])).unwrap();
        assert!(app.input().is_err());
        assert_eq!(app.latest_count().get(), None);
        app.teardown();
    }

    #[test]
    fn test_unpublished_report_prints_nothing_in_count_mode() {
        let app = App::init(&cli(&["--no-config", "-q", "abc"])).unwrap();
        let report = FetchReport::empty("abc", "followers");
        assert_eq!(app.render(&report), "");
        app.teardown();
    }

    #[test]
    fn test_published_report_prints_grouped_count() {
        let app = App::init(&cli(&["--no-config", "--plain", "abc"])).unwrap();
        let mut report = FetchReport::empty("abc", "followers");
        report.count = 1500;
        report.published = Some(1500);
        assert_eq!(app.render(&report), "1,500");
        app.teardown();
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(App::init(&cli(&["--no-config", "-q", "--timeout", "0", "abc"])).is_err());
    }

    #[test]
    fn test_input_uses_resolved_config() {
        let app = App::init(&cli(&["--no-config", "-q", "--kind", "3", "abc"])).unwrap();
        let input = app.input().unwrap();
        assert_eq!(input.target.subject(), "abc");
        assert_eq!(input.target.endpoints().len(), 2);
        assert_eq!(input.params.kinds, vec![3]);
        app.teardown();
    }
}
