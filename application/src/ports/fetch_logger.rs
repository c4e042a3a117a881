//! Port for structured fetch logging.
//!
//! Records what happened on the wire during a fetch (endpoint lifecycle,
//! contributors added, counts published) in a machine-readable form.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a replayable
//! transcript (JSONL).

use serde_json::Value;

/// A structured fetch event for logging.
pub struct FetchEvent {
    /// Event type identifier (e.g., "endpoint_done", "count_published").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl FetchEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging fetch events to a structured log.
///
/// Synchronous and non-fallible: a broken log must not disturb the fetch.
pub trait FetchLogger: Send + Sync {
    /// Record a fetch event.
    fn log(&self, event: FetchEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoFetchLogger;

impl FetchLogger for NoFetchLogger {
    fn log(&self, _event: FetchEvent) {}
}
