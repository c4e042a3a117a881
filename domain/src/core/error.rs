//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Subject identifier cannot be empty")]
    EmptySubject,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Malformed relay message: {0}")]
    MalformedMessage(String),
}

impl DomainError {
    /// Check if this error came from parsing an inbound frame
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, DomainError::MalformedMessage(_))
    }
}
