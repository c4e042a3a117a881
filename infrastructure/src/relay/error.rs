//! Error types for the WebSocket relay adapter

use tally_application::ConnectorError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Result type alias for relay socket operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur when talking to a relay over WebSocket
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Not a WebSocket address: {0}")]
    NotWebSocket(String),

    #[error("Handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    #[error("WebSocket error: {0}")]
    Socket(#[from] tungstenite::Error),
}

impl RelayError {
    /// Map into the port error, keeping connect-phase failures distinct
    pub fn into_connect_error(self) -> ConnectorError {
        match self {
            RelayError::NotWebSocket(url) => ConnectorError::InvalidEndpoint(url),
            other => ConnectorError::ConnectFailed(other.to_string()),
        }
    }
}
