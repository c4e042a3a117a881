//! Core domain concepts shared across all subdomains.
//!
//! - [`endpoint::Endpoint`]: a relay server address
//! - [`target::QueryTarget`]: the subject being looked up plus its endpoints
//! - [`error::DomainError`]: domain-level errors

pub mod endpoint;
pub mod error;
pub mod target;
