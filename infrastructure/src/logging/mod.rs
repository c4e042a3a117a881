//! Logging infrastructure: structured fetch transcripts.
//!
//! Provides [`JsonlFetchLogger`], a JSONL file writer that implements
//! the [`FetchLogger`](tally_application::FetchLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlFetchLogger;
