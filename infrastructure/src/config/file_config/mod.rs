//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod fetch;
mod output;
mod query;
mod relays;

pub use fetch::FileFetchConfig;
pub use output::FileOutputConfig;
pub use query::FileQueryConfig;
pub use relays::FileRelaysConfig;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_application::FetchParams;
use tally_domain::{ConfigIssue, Endpoint};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// What to look up
    pub query: FileQueryConfig,
    /// Where to look
    pub relays: FileRelaysConfig,
    /// Timeout settings
    pub fetch: FileFetchConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.query.validate());
        issues.extend(self.relays.validate());
        issues.extend(self.fetch.validate());
        issues
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.relays.endpoints()
    }

    /// Build use-case parameters from the `[query]` and `[fetch]` sections
    pub fn fetch_params(&self) -> FetchParams {
        FetchParams::default()
            .with_label(self.query.label.clone())
            .with_kinds(self.query.kinds.clone())
            .with_timeout(Duration::from_secs(self.fetch.timeout_secs))
    }
}
