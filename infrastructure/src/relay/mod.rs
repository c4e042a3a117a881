//! WebSocket relay adapter
//!
//! Implements the [`RelayConnector`](tally_application::RelayConnector) port
//! on top of `tokio-tungstenite`.

pub mod connection;
pub mod error;

pub use connection::{WsRelayConnection, WsRelayConnector};
pub use error::RelayError;
