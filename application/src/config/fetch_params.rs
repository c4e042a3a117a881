//! Fetch parameters: per-run knobs for the fetch use case.
//!
//! [`FetchParams`] groups what the caller may tune about one fetch without
//! changing what is being looked up: subscription label, event kinds, and
//! the per-endpoint timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tally_domain::{CONTACT_LIST_KIND, SubscriptionLabel};

/// Per-endpoint timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Label sent in the REQ and expected on EVENT/EOSE replies.
    pub label: SubscriptionLabel,
    /// Event kinds requested.
    pub kinds: Vec<u32>,
    /// How long one endpoint may take, from connect attempt to EOSE.
    pub timeout: Duration,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            label: SubscriptionLabel::default(),
            kinds: vec![CONTACT_LIST_KIND],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchParams {
    // ==================== Builder Methods ====================

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = SubscriptionLabel::new(label);
        self
    }

    pub fn with_kinds(mut self, kinds: Vec<u32>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_follower_fetch() {
        let params = FetchParams::default();
        assert_eq!(params.label.as_str(), "followers");
        assert_eq!(params.kinds, vec![3]);
        assert_eq!(params.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_chain() {
        let params = FetchParams::default()
            .with_label("fc")
            .with_kinds(vec![3, 10002])
            .with_timeout_seconds(4);
        assert_eq!(params.label.as_str(), "fc");
        assert_eq!(params.kinds, vec![3, 10002]);
        assert_eq!(params.timeout, Duration::from_secs(4));
    }
}
