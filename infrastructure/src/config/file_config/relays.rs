//! Relay list from TOML (`[relays]` section)

use serde::{Deserialize, Serialize};
use tally_domain::{ConfigIssue, ConfigIssueCode, Endpoint};

/// Relays to query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelaysConfig {
    pub urls: Vec<String>,
}

impl Default for FileRelaysConfig {
    fn default() -> Self {
        Self {
            urls: Endpoint::default_relays()
                .into_iter()
                .map(|e| e.as_str().to_string())
                .collect(),
        }
    }
}

impl FileRelaysConfig {
    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.urls.iter().map(|u| Endpoint::new(u.trim())).collect()
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.urls.is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoRelays,
                "relays.urls is empty; nothing will be fetched",
            ));
        }

        for endpoint in self.endpoints() {
            if !endpoint.is_websocket() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::NonWebSocketRelay {
                        url: endpoint.to_string(),
                    },
                    format!("relays.urls: '{endpoint}' is not a ws:// or wss:// address"),
                ));
            }
        }

        issues
    }
}
