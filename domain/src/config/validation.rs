//! Structured configuration issues.
//!
//! Validation collects every problem instead of stopping at the first one,
//! so the CLI can print warnings and only refuse to run on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the fetch cannot run with this configuration.
    Error,
    /// Non-fatal: the fetch runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No relays configured; the fetch is a no-op.
    NoRelays,
    /// A relay address does not use `ws://` or `wss://`.
    NonWebSocketRelay { url: String },
    /// The subject is not a 64-character hex key.
    SubjectNotHexKey,
    /// The subscription label is empty.
    EmptyLabel,
    /// No event kinds requested.
    NoKinds,
    /// Timeout of zero seconds.
    ZeroTimeout,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
