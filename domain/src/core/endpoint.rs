//! Endpoint value object representing one relay server

use serde::{Deserialize, Serialize};

/// A relay server address (Value Object)
///
/// Kept as the raw string the user configured so it can be displayed and
/// logged exactly as written. Scheme checks happen in config validation,
/// not here: an unreachable address is just an endpoint that fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the address as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address uses a WebSocket scheme
    pub fn is_websocket(&self) -> bool {
        self.0.starts_with("wss://") || self.0.starts_with("ws://")
    }

    /// The relays the fetcher talks to when nothing else is configured
    pub fn default_relays() -> Vec<Endpoint> {
        vec![
            Endpoint::new("wss://relay.damus.io"),
            Endpoint::new("wss://nos.lol"),
        ]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Endpoint::new(s)
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Endpoint::new(s)
    }
}
