//! Follower tally: dedup set, per-endpoint state machines, and the
//! aggregation core that ties them together.

pub mod contributors;
pub mod engine;
pub mod report;
pub mod state;

pub use contributors::ContributorSet;
pub use engine::{Effect, EndpointEvent, Tally};
pub use report::{EndpointReport, FetchReport};
pub use state::{DoneReason, EndpointState, EndpointTracker};
