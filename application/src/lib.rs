//! Application layer for relay-tally
//!
//! This crate contains the fetch use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_TIMEOUT, FetchParams};
pub use ports::{
    count_sink::{CountSink, NoSink},
    fetch_logger::{FetchEvent, FetchLogger, NoFetchLogger},
    progress::{FetchProgressNotifier, NoProgress},
    relay_connector::{ConnectorError, RelayConnection, RelayConnector},
};
pub use use_cases::fetch_count::{FetchCountError, FetchCountInput, FetchCountUseCase};
