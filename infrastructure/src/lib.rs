//! Infrastructure layer for relay-tally
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the WebSocket relay connector, the JSONL
//! fetch logger, and configuration file loading.

pub mod config;
pub mod logging;
pub mod relay;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileFetchConfig, FileOutputConfig, FileQueryConfig,
    FileRelaysConfig,
};
pub use logging::JsonlFetchLogger;
pub use relay::{RelayError, WsRelayConnection, WsRelayConnector};
