//! Per-endpoint connection state machine
//!
//! ```text
//! Connecting ──open──▶ AwaitingResults ──EOSE──▶ Done(EndOfStoredEvents)
//!     │                      │
//!     └──fail/timeout────────┴──error/close/timeout──▶ Done(..)
//! ```
//!
//! `Done` is terminal: nothing moves an endpoint out of it.

use crate::core::endpoint::Endpoint;
use serde::{Deserialize, Serialize};

/// Why an endpoint stopped contributing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoneReason {
    /// The relay sent EOSE for our subscription
    EndOfStoredEvents,
    /// The connection never opened
    ConnectFailed,
    /// The open connection reported an error
    ConnectionError,
    /// The relay closed the connection before EOSE
    Closed,
    /// The endpoint timeout fired first
    TimedOut,
}

impl DoneReason {
    /// Whether the relay finished normally
    pub fn is_complete(&self) -> bool {
        matches!(self, DoneReason::EndOfStoredEvents)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DoneReason::EndOfStoredEvents => "eose",
            DoneReason::ConnectFailed => "connect failed",
            DoneReason::ConnectionError => "connection error",
            DoneReason::Closed => "closed",
            DoneReason::TimedOut => "timed out",
        }
    }
}

impl std::fmt::Display for DoneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    Connecting,
    AwaitingResults,
    Done(DoneReason),
}

/// One endpoint's state plus what it has delivered so far
#[derive(Debug, Clone)]
pub struct EndpointTracker {
    endpoint: Endpoint,
    state: EndpointState,
    events: usize,
    contributed: usize,
    detail: Option<String>,
}

impl EndpointTracker {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            state: EndpointState::Connecting,
            events: 0,
            contributed: 0,
            detail: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, EndpointState::Done(_))
    }

    pub fn done_reason(&self) -> Option<DoneReason> {
        match self.state {
            EndpointState::Done(reason) => Some(reason),
            _ => None,
        }
    }

    /// Matching EVENT frames received (duplicates included)
    pub fn events(&self) -> usize {
        self.events
    }

    /// Contributors this endpoint was first to deliver
    pub fn contributed(&self) -> usize {
        self.contributed
    }

    /// Error text attached when the endpoint failed
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Connecting → AwaitingResults. Returns `false` in any other state.
    pub fn open(&mut self) -> bool {
        if self.state == EndpointState::Connecting {
            self.state = EndpointState::AwaitingResults;
            true
        } else {
            false
        }
    }

    /// Count one matching event. Ignored unless awaiting results.
    pub fn record_event(&mut self, was_new: bool) -> bool {
        if self.state != EndpointState::AwaitingResults {
            return false;
        }
        self.events += 1;
        if was_new {
            self.contributed += 1;
        }
        true
    }

    /// Move to `Done`. Returns `false` if already done.
    pub fn finish(&mut self, reason: DoneReason, detail: Option<String>) -> bool {
        if self.is_done() {
            return false;
        }
        self.state = EndpointState::Done(reason);
        self.detail = detail;
        true
    }
}
