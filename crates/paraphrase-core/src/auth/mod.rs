//! Authentication module for managing the client-side bearer token session.
//!
//! This module provides:
//! - `SessionManager`: owns the token, its persistence and expiry detection
//! - `TokenStore`: persistence backends (file, OS keyring, memory)
//! - `AuthSignal` / `SessionEvent`: inbound signals and outbound notifications
//! - `ExpiryWatcher`: background task that applies signals and re-checks expiry
//!
//! Tokens are JWTs issued by the backend. They are decoded here without
//! signature verification, only to read the expiration claim.

pub mod clock;
pub mod events;
pub mod session;
pub mod storage;
pub mod token;
pub mod watcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{signal_channel, AuthSignal, SessionEvent, SignalReceiver, SignalSender};
pub use session::{SessionError, SessionManager};
pub use storage::{
    FileStore, KeyringStore, MemoryStore, StorageError, TokenStore, NATIVE_KEYCHAIN,
};
pub use token::{decode_claims, is_expired_at, TokenClaims, TokenError};
pub use watcher::{ExpiryWatcher, DEFAULT_POLL_INTERVAL};
