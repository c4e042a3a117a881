//! Fetch result value objects

use super::state::DoneReason;
use crate::core::endpoint::Endpoint;
use serde::{Deserialize, Serialize};

/// How one endpoint fared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointReport {
    pub endpoint: Endpoint,
    /// `None` only when the report is taken before the endpoint finished
    pub outcome: Option<DoneReason>,
    /// Matching EVENT frames received
    pub events: usize,
    /// Contributors this endpoint delivered first
    pub contributed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Complete result of one fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    pub subject: String,
    pub label: String,
    /// Distinct contributors collected
    pub count: usize,
    /// Last value handed to the display sink; `None` if it was never written
    pub published: Option<usize>,
    pub endpoints: Vec<EndpointReport>,
}

impl FetchReport {
    /// Report for a fetch that had nothing to query
    pub fn empty(subject: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            label: label.into(),
            count: 0,
            published: None,
            endpoints: Vec::new(),
        }
    }

    /// Endpoints that reached EOSE
    pub fn completed(&self) -> usize {
        self.endpoints
            .iter()
            .filter(|e| e.outcome.is_some_and(|o| o.is_complete()))
            .count()
    }

    /// Endpoints that ended any other way
    pub fn failed(&self) -> usize {
        self.endpoints
            .iter()
            .filter(|e| e.outcome.is_some_and(|o| !o.is_complete()))
            .count()
    }
}
