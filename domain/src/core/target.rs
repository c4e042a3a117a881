//! Query target value object

use super::endpoint::Endpoint;
use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// What one fetch looks up, and where (Value Object)
///
/// The subject is opaque to the aggregator: it is copied verbatim into the
/// outbound filter and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTarget {
    subject: String,
    endpoints: Vec<Endpoint>,
}

impl QueryTarget {
    /// Create a target, rejecting a blank subject.
    ///
    /// An empty endpoint list is accepted; fetching it is a no-op.
    pub fn new(subject: impl Into<String>, endpoints: Vec<Endpoint>) -> Result<Self, DomainError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(DomainError::EmptySubject);
        }
        Ok(Self { subject, endpoints })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }
}

/// Check for 64 lowercase-or-uppercase hex characters
pub fn is_hex_key(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}
