//! Relay wire protocol
//!
//! Only the slice of the relay protocol the follower fetch needs:
//!
//! - **Outbound**: `["REQ", <label>, <filter>]`
//! - **Inbound**: `["EVENT", <label>, <event>]` and `["EOSE", <label>]`
//!
//! Every other frame is classified as [`RelayMessage::Other`] and dropped by
//! the aggregator.

pub mod filter;
pub mod label;
pub mod message;

pub use filter::Filter;
pub use label::SubscriptionLabel;
pub use message::{ClientMessage, RelayMessage};
