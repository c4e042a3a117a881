//! Subscription label value object

use serde::{Deserialize, Serialize};

/// Client-chosen string correlating one REQ with its EVENT/EOSE replies.
///
/// One fetch reuses the same label on every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionLabel(String);

impl SubscriptionLabel {
    pub const DEFAULT: &'static str = "followers";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an inbound frame's label refers to this subscription
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl Default for SubscriptionLabel {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl std::fmt::Display for SubscriptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
