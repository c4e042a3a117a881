//! Display sink port
//!
//! The one outward side effect of a fetch besides connection lifecycle: a
//! single value that is overwritten each time the aggregate is published.

/// Receives the aggregate count
///
/// Never called with zero; a fetch that finds nothing leaves the sink
/// untouched.
pub trait CountSink: Send + Sync {
    /// Overwrite the displayed count
    fn publish(&self, count: usize);
}

/// Sink that discards every value
pub struct NoSink;

impl CountSink for NoSink {
    fn publish(&self, _count: usize) {}
}
