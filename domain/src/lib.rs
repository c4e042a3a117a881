//! Domain layer for relay-tally
//!
//! This crate contains the core aggregation logic, wire types, and value
//! objects. It has no dependencies on async runtimes, sockets, or terminals.
//!
//! # Core Concepts
//!
//! ## Tally
//!
//! A fetch asks several relays the same question ("which contact lists tag
//! this key?") and counts distinct authors across every answer. [`Tally`]
//! is the sans-IO state machine behind that: it is fed endpoint events and
//! returns the effects the caller must perform.
//!
//! ## Endpoint lifecycle
//!
//! Each relay moves `Connecting → AwaitingResults → Done`, with `Done`
//! reachable from anywhere via error or timeout, and never left again.

pub mod config;
pub mod core;
pub mod protocol;
pub mod tally;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    endpoint::Endpoint,
    error::DomainError,
    target::{QueryTarget, is_hex_key},
};
pub use protocol::{ClientMessage, Filter, RelayMessage, SubscriptionLabel, filter::CONTACT_LIST_KIND};
pub use tally::{
    ContributorSet, DoneReason, Effect, EndpointEvent, EndpointReport, EndpointState,
    EndpointTracker, FetchReport, Tally,
};
