//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod fetch_count;
