//! Core library for the paraphrase client.
//!
//! This crate contains everything a shell (CLI, GUI, browser bundle) needs to
//! talk to the paraphrase backend:
//! - `auth`: bearer token session management, persistence and expiry tracking
//! - `api`: the request gateway that attaches the token and reacts to 401s
//! - `models`: request/response wire types
//! - `forms`: client-side input shape validation
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthSignal, Clock, ExpiryWatcher, SessionEvent, SessionManager, SignalSender, SystemClock,
    TokenStore,
};
pub use config::{Config, TokenBackend};
pub use models::ParaphraseMode;
