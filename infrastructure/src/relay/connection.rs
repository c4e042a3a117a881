//! WebSocket implementation of the relay connection ports.
//!
//! Relays speak JSON text frames. Binary frames are decoded as UTF-8 when
//! possible and dropped otherwise; ping/pong is answered by tungstenite
//! itself; a `Close` frame ends the stream.

use super::error::{RelayError, Result};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tally_application::{ConnectorError, RelayConnection, RelayConnector};
use tally_domain::Endpoint;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket connections to relays
#[derive(Debug, Clone, Default)]
pub struct WsRelayConnector;

impl WsRelayConnector {
    pub fn new() -> Self {
        Self
    }

    async fn open(endpoint: &Endpoint) -> Result<WsRelayConnection> {
        if !endpoint.is_websocket() {
            return Err(RelayError::NotWebSocket(endpoint.to_string()));
        }

        let (stream, response) = connect_async(endpoint.as_str())
            .await
            .map_err(RelayError::Handshake)?;
        debug!(
            endpoint = %endpoint,
            status = %response.status(),
            "WebSocket connected"
        );

        Ok(WsRelayConnection {
            endpoint: endpoint.clone(),
            stream,
            closed: false,
        })
    }
}

#[async_trait]
impl RelayConnector for WsRelayConnector {
    async fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> std::result::Result<Box<dyn RelayConnection>, ConnectorError> {
        let conn = Self::open(endpoint)
            .await
            .map_err(RelayError::into_connect_error)?;
        Ok(Box::new(conn))
    }
}

/// One open WebSocket to a relay
pub struct WsRelayConnection {
    endpoint: Endpoint,
    stream: WsStream,
    closed: bool,
}

#[async_trait]
impl RelayConnection for WsRelayConnection {
    async fn send(&mut self, text: &str) -> std::result::Result<(), ConnectorError> {
        trace!(endpoint = %self.endpoint, frame = text, "Sending frame");
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .map_err(|e| ConnectorError::SendFailed(RelayError::from(e).to_string()))
    }

    async fn recv(&mut self) -> Option<std::result::Result<String, ConnectorError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => {
                        trace!(endpoint = %self.endpoint, "Dropping non-UTF-8 binary frame");
                    }
                },
                Ok(Message::Close(frame)) => {
                    debug!(endpoint = %self.endpoint, ?frame, "Relay closed the connection");
                    self.closed = true;
                    return None;
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Err(e) => {
                    return Some(Err(ConnectorError::ReceiveFailed(
                        RelayError::from(e).to_string(),
                    )));
                }
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.close(None).await {
            debug!(endpoint = %self.endpoint, error = %e, "Close handshake failed");
        }
    }
}
