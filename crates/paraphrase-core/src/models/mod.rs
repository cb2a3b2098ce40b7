//! Wire types exchanged with the paraphrase backend.
//!
//! This module contains:
//! - `UserRegisterRequest`, `UserLoginRequest`, `TokenResponse`: account flows
//! - `ParaphraseRequest`, `ParaphraseResponse`, `ParaphraseMode`: rewriting
//! - `ApiErrorResponse`: the backend's `{"detail": ...}` error body
//!
//! With the `ts` feature enabled, TypeScript bindings are generated for a
//! browser front end via `ts-rs`.

pub mod paraphrase;
pub mod user;

pub use paraphrase::{ParaphraseMode, ParaphraseRequest, ParaphraseResponse, ParseModeError};
pub use user::{
    ApiErrorResponse, TokenResponse, UserLoginRequest, UserRegisterRequest, UserRegisterResponse,
};
