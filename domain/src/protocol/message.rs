//! Outbound and inbound relay frames.
//!
//! Frames are JSON arrays whose first element is a tag string. Parsing is
//! shape-matching only: signatures and ids are never checked.

use super::filter::Filter;
use super::label::SubscriptionLabel;
use crate::core::error::DomainError;
use serde_json::Value;

/// A frame sent from the client to a relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Open a subscription: `["REQ", label, filter]`
    Req {
        label: SubscriptionLabel,
        filter: Filter,
    },
}

impl ClientMessage {
    pub fn req(label: SubscriptionLabel, filter: Filter) -> Self {
        ClientMessage::Req { label, filter }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ClientMessage::Req { label, filter } => {
                serde_json::json!(["REQ", label.as_str(), filter])
            }
        }
    }

    /// Serialise to the text frame sent over the socket
    pub fn encode(&self) -> String {
        self.to_value().to_string()
    }
}

/// A frame received from a relay, classified by tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayMessage {
    /// `["EVENT", label, {"pubkey": author, ...}]`
    Event { label: String, author: String },
    /// `["EOSE", label]`
    EndOfStoredEvents { label: String },
    /// Any other well-formed array frame (`NOTICE`, `CLOSED`, `OK`, ...)
    Other { tag: String },
}

impl RelayMessage {
    /// Classify one inbound text frame.
    ///
    /// Returns [`DomainError::MalformedMessage`] for invalid JSON, non-array
    /// frames, and `EVENT`/`EOSE` frames missing the fields the aggregator
    /// reads.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| DomainError::MalformedMessage(e.to_string()))?;

        let Some(items) = value.as_array() else {
            return Err(DomainError::MalformedMessage("frame is not an array".into()));
        };

        let tag = items
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| DomainError::MalformedMessage("missing tag".into()))?;

        match tag {
            "EVENT" => {
                let label = label_at(items)?;
                let author = items
                    .get(2)
                    .and_then(|event| event.get("pubkey"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| DomainError::MalformedMessage("event without pubkey".into()))?;
                Ok(RelayMessage::Event {
                    label,
                    author: author.to_string(),
                })
            }
            "EOSE" => Ok(RelayMessage::EndOfStoredEvents {
                label: label_at(items)?,
            }),
            other => Ok(RelayMessage::Other {
                tag: other.to_string(),
            }),
        }
    }
}

fn label_at(items: &[Value]) -> Result<String, DomainError> {
    items
        .get(1)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DomainError::MalformedMessage("missing subscription label".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_req_wire_shape() {
        let msg = ClientMessage::req(SubscriptionLabel::default(), Filter::new(vec![3], "abc"));
        let parsed: Value = serde_json::from_str(&msg.encode()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!(["REQ", "followers", {"kinds": [3], "#p": ["abc"]}])
        );
    }

    #[test]
    fn test_parse_event() {
        let msg = RelayMessage::parse(
            r#"["EVENT","followers",{"id":"e1","pubkey":"alice","kind":3,"tags":[["p","abc"]]}]"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            RelayMessage::Event {
                label: "followers".into(),
                author: "alice".into()
            }
        );
    }

    #[test]
    fn test_parse_eose() {
        let msg = RelayMessage::parse(r#"["EOSE","followers"]"#).unwrap();
        assert_eq!(
            msg,
            RelayMessage::EndOfStoredEvents {
                label: "followers".into()
            }
        );
    }

    #[test]
    fn test_parse_other_tags() {
        let msg = RelayMessage::parse(r#"["NOTICE","rate limited"]"#).unwrap();
        assert_eq!(msg, RelayMessage::Other { tag: "NOTICE".into() });
    }

    #[test]
    fn test_parse_failures() {
        for raw in [
            "not json",
            r#"{"type":"EVENT"}"#,
            "[]",
            "[42]",
            r#"["EVENT","followers"]"#,
            r#"["EVENT","followers",{"kind":3}]"#,
            r#"["EVENT","followers",{"pubkey":7}]"#,
            r#"["EOSE"]"#,
        ] {
            let err = RelayMessage::parse(raw).unwrap_err();
            assert!(err.is_parse_failure(), "expected parse failure for {raw}");
        }
    }
}
