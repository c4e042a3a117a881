//! Fetch behavior from TOML (`[fetch]` section)

use serde::{Deserialize, Serialize};
use tally_application::DEFAULT_TIMEOUT;
use tally_domain::{ConfigIssue, ConfigIssueCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFetchConfig {
    /// Per-relay timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileFetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl FileFetchConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.timeout_secs == 0 {
            vec![ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "fetch.timeout_secs cannot be 0",
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(FileFetchConfig::default().timeout_secs, 10);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let issues = FileFetchConfig { timeout_secs: 0 }.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
