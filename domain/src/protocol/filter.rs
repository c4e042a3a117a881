//! Subscription filter sent inside a REQ frame

use serde::{Deserialize, Serialize};

/// Event kind for contact lists; a follower is anyone whose contact list
/// tags the subject.
pub const CONTACT_LIST_KIND: u32 = 3;

/// Filter object of a REQ frame.
///
/// Serialises to `{"kinds":[3],"#p":["<subject>"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub kinds: Vec<u32>,
    #[serde(rename = "#p")]
    pub p_tags: Vec<String>,
}

impl Filter {
    /// Filter for the given kinds tagging exactly one subject
    pub fn new(kinds: Vec<u32>, subject: impl Into<String>) -> Self {
        Self {
            kinds,
            p_tags: vec![subject.into()],
        }
    }
}
