//! REST API client module for the paraphrase backend.
//!
//! This module provides the `ApiClient` (the request gateway) which attaches
//! the session's bearer token to outgoing calls and turns authorization
//! failures into session signals.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
