//! REST API client module for the HireHub backend.
//!
//! `ApiClient` wraps a shared `reqwest::Client` and guards every request:
//! the bearer token is re-read and re-validated before transmission, and a
//! 401 response invalidates the session before the error reaches the caller.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

#[cfg(test)]
pub(crate) use client::testutil;
