//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod count_sink;
pub mod fetch_logger;
pub mod progress;
pub mod relay_connector;
