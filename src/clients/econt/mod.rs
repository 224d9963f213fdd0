//! Authenticated façade over the HTTP client.
//!
//! - [`EcontClient`]: credentials, live/demo mode and the resource registry
//! - [`ClientContext`]: the shared client state passed to resources and models
//! - [`EcontError`]: error type of the façade and resources

mod client;
mod errors;

pub use client::{ClientContext, EcontClient};
pub use errors::EcontError;
