//! Application-level configuration.
//!
//! - [`FetchParams`]: label, kinds, and timeout for one fetch

pub mod fetch_params;

pub use fetch_params::{DEFAULT_TIMEOUT, FetchParams};
