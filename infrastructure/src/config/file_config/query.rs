//! Query configuration from TOML (`[query]` section)
//!
//! ```toml
//! [query]
//! subject = "fecb1d78e1210c66afaa3fc92e82a122430d6001b148faba30cf2ae4e6faeff3"
//! label = "followers"
//! kinds = [3]
//! ```

use serde::{Deserialize, Serialize};
use tally_domain::{
    CONTACT_LIST_KIND, ConfigIssue, ConfigIssueCode, SubscriptionLabel, is_hex_key,
};

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    /// Public key whose followers are counted
    pub subject: Option<String>,
    /// Subscription label sent in the REQ
    pub label: String,
    /// Event kinds requested
    pub kinds: Vec<u32>,
}

impl Default for FileQueryConfig {
    fn default() -> Self {
        Self {
            subject: None,
            label: SubscriptionLabel::DEFAULT.to_string(),
            kinds: vec![CONTACT_LIST_KIND],
        }
    }
}

impl FileQueryConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(subject) = &self.subject
            && !is_hex_key(subject.trim())
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::SubjectNotHexKey,
                format!("query.subject: '{subject}' is not a 64-character hex key"),
            ));
        }

        if self.label.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyLabel,
                "query.label cannot be empty",
            ));
        }

        if self.kinds.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoKinds,
                "query.kinds must list at least one event kind",
            ));
        }

        issues
    }
}
