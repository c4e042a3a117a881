//! Relay connector port
//!
//! Defines how the application layer opens and talks to one relay.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use tally_domain::Endpoint;
use thiserror::Error;

/// Errors a relay connection can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

/// Opens connections to relays
#[async_trait]
pub trait RelayConnector: Send + Sync {
    /// Open a bidirectional text-frame connection to `endpoint`
    async fn connect(&self, endpoint: &Endpoint)
    -> Result<Box<dyn RelayConnection>, ConnectorError>;
}

/// An open connection to one relay
#[async_trait]
pub trait RelayConnection: Send {
    /// Send one text frame
    async fn send(&mut self, text: &str) -> Result<(), ConnectorError>;

    /// Receive the next text frame.
    ///
    /// Returns `None` once the relay has ended the stream. Must be cancel
    /// safe: the caller races it against timers.
    async fn recv(&mut self) -> Option<Result<String, ConnectorError>>;

    /// Close the connection. Called at most once per connection.
    async fn close(&mut self);
}
