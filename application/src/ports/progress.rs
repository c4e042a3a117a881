//! Progress notification port
//!
//! Defines the interface for reporting progress during a fetch.

use tally_domain::{DoneReason, Endpoint, FetchReport};

/// Callback for progress updates during a fetch
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, nothing).
pub trait FetchProgressNotifier: Send + Sync {
    /// Called once before any connection is attempted
    fn on_fetch_start(&self, subject: &str, endpoints: &[Endpoint]);

    /// Called when an endpoint is connected and the REQ went out
    fn on_endpoint_opened(&self, _endpoint: &Endpoint) {}

    /// Called when an endpoint reaches `Done`
    fn on_endpoint_done(&self, endpoint: &Endpoint, reason: DoneReason);

    /// Called each time the aggregate is published
    fn on_count_published(&self, _count: usize) {}

    /// Called once every endpoint is done
    fn on_fetch_complete(&self, report: &FetchReport);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl FetchProgressNotifier for NoProgress {
    fn on_fetch_start(&self, _subject: &str, _endpoints: &[Endpoint]) {}
    fn on_endpoint_done(&self, _endpoint: &Endpoint, _reason: DoneReason) {}
    fn on_fetch_complete(&self, _report: &FetchReport) {}
}
