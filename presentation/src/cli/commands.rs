//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tally_domain::OutputFormat as DomainOutputFormat;

/// Output format for the final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The follower count only, digit-grouped
    Count,
    /// Per-relay breakdown plus the total
    Full,
    /// The whole fetch report as JSON
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Count => DomainOutputFormat::Count,
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for relay-tally
#[derive(Parser, Debug)]
#[command(name = "relay-tally")]
#[command(author, version, about = "Count distinct followers of a key across Nostr relays")]
#[command(long_about = r#"
relay-tally asks several relays for contact lists that mention a public key
and counts the distinct authors across every answer.

Each relay gets one subscription. The count is updated whenever a relay
finishes (end of stored events, error, close or timeout) and is never shown
while it is still zero.

Configuration is merged from (lowest to highest priority):
1. ~/.config/relay-tally/config.toml   Global config
2. ./tally.toml or ./.tally.toml       Project-level config
3. --config <path>                     Explicit config file
4. RELAY_TALLY_* environment variables (e.g. RELAY_TALLY_FETCH__TIMEOUT_SECS=5)
5. Command-line flags

Example:
  relay-tally fecb1d78e1210c66afaa3fc92e82a122430d6001b148faba30cf2ae4e6faeff3
  relay-tally -r wss://relay.damus.io -r wss://nos.lol --timeout 5 -o full <pubkey>
"#)]
pub struct Cli {
    /// Hex public key whose followers are counted (falls back to query.subject)
    pub subject: Option<String>,

    /// Relay to query (can be specified multiple times; replaces configured relays)
    #[arg(short, long = "relay", value_name = "URL")]
    pub relays: Vec<String>,

    /// Subscription label sent with the request
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Event kind to request (can be specified multiple times)
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<u32>,

    /// Per-relay timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and the live count
    #[arg(short, long)]
    pub quiet: bool,

    /// Print progress as plain lines instead of live bars
    #[arg(long, conflicts_with = "quiet")]
    pub plain: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write a JSONL transcript of the fetch to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,
}
