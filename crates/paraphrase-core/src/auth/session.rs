//! The session manager: sole owner of the persisted bearer token.
//!
//! `is_authenticated` is a cache of "a token is stored and it has not
//! expired". It is recomputed by `check_auth` from storage and the clock and
//! is never persisted itself.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::events::{AuthSignal, SessionEvent, EVENT_CHANNEL_CAPACITY};
use super::storage::{MemoryStore, StorageError, TokenStore};
use super::token::{decode_claims, TokenClaims};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Refusing to store an empty token")]
    EmptyToken,
}

/// What the store held when it was last read.
enum Stored {
    Empty,
    Token(String),
    Corrupt,
}

struct Inner {
    store: Box<dyn TokenStore>,
    /// Set once the configured store failed and was swapped for memory.
    degraded: bool,
    token: Option<String>,
    authenticated: bool,
}

impl Inner {
    /// Switch to an in-memory store seeded with what we currently believe.
    fn degrade(&mut self, op: &str, err: StorageError) {
        warn!(
            backend = self.store.name(),
            op,
            error = %err,
            "Token store failed, continuing with an in-memory session"
        );
        let fallback = match self.token.as_deref() {
            Some(token) => MemoryStore::with_token(token),
            None => MemoryStore::new(),
        };
        self.store = Box::new(fallback);
        self.degraded = true;
    }

    fn load(&mut self) -> Stored {
        match self.store.load() {
            Ok(Some(token)) => Stored::Token(token),
            Ok(None) => Stored::Empty,
            // The backend works, only its entry is unreadable
            Err(StorageError::Corrupt(e)) => {
                warn!(backend = self.store.name(), error = %e, "Stored entry is unreadable");
                Stored::Corrupt
            }
            Err(e) => {
                self.degrade("load", e);
                match self.token.clone() {
                    Some(token) => Stored::Token(token),
                    None => Stored::Empty,
                }
            }
        }
    }

    fn save(&mut self, token: &str) {
        if let Err(e) = self.store.save(token) {
            self.degrade("save", e);
            // Memory stores never fail
            let _ = self.store.save(token);
        }
    }

    fn remove(&mut self) {
        if let Err(e) = self.store.remove() {
            self.degrade("remove", e);
            let _ = self.store.remove();
        }
    }

    fn clear(&mut self) {
        self.token = None;
        self.authenticated = false;
    }
}

/// Shared session context. Hand out `Arc<SessionManager>` to whatever needs
/// to read or change the authentication state.
pub struct SessionManager {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a session over `store` and validate whatever it already holds.
    pub fn new(store: Box<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = Self {
            inner: Mutex::new(Inner {
                store,
                degraded: false,
                token: None,
                authenticated: false,
            }),
            clock,
            events,
        };
        // Nothing read from storage counts until it has been checked
        session.check_auth();
        session
    }

    pub fn with_system_clock(store: Box<dyn TokenStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Store a freshly issued token, replacing any previous one.
    pub fn login(&self, token: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        {
            let mut inner = self.lock();
            inner.save(token);
            inner.token = Some(token.to_string());
            inner.authenticated = true;
        }
        info!("Session established");
        self.emit(SessionEvent::Established);
        Ok(())
    }

    /// Forget the token. Calling this without a session does nothing.
    pub fn logout(&self) {
        let had_token = {
            let mut inner = self.lock();
            let had_token = inner.token.is_some();
            inner.remove();
            inner.clear();
            had_token
        };
        if had_token {
            info!("Session cleared");
            self.emit(SessionEvent::Cleared);
        }
    }

    /// Re-derive the authentication state from storage and the clock,
    /// evicting a stored token that is expired or can't be decoded.
    pub fn check_auth(&self) -> bool {
        let now_ms = self.clock.now_ms();
        let (authenticated, event) = {
            let mut inner = self.lock();
            let was_authenticated = inner.authenticated;
            let previous = inner.token.clone();

            match inner.load() {
                Stored::Empty => {
                    inner.clear();
                    let event = was_authenticated.then_some(SessionEvent::Cleared);
                    (false, event)
                }
                Stored::Corrupt => {
                    inner.remove();
                    inner.clear();
                    (false, Some(SessionEvent::Expired))
                }
                Stored::Token(token) => match decode_claims(&token) {
                    Ok(claims) if !claims.is_expired_at(now_ms) => {
                        let changed = !was_authenticated || previous.as_deref() != Some(token.as_str());
                        inner.token = Some(token);
                        inner.authenticated = true;
                        (true, changed.then_some(SessionEvent::Established))
                    }
                    outcome => {
                        match outcome {
                            Ok(claims) => info!(exp = claims.exp, now_ms, "Stored token expired"),
                            Err(e) => warn!(error = %e, "Stored token is malformed, discarding"),
                        }
                        inner.remove();
                        inner.clear();
                        (false, Some(SessionEvent::Expired))
                    }
                },
            }
        };
        debug!(authenticated, "Auth state checked");
        if let Some(event) = event {
            self.emit(event);
        }
        authenticated
    }

    /// Apply a signal coming from another part of the client.
    pub fn apply(&self, signal: AuthSignal) {
        debug!(?signal, "Applying auth signal");
        match signal {
            AuthSignal::ExternalLogin(token) => {
                if self.bearer_token().as_deref() == Some(token.as_str()) {
                    debug!("Token already active");
                    return;
                }
                if let Err(e) = self.login(&token) {
                    warn!(error = %e, "Ignoring external login");
                }
            }
            AuthSignal::ExternalLogout => self.logout(),
            AuthSignal::StorageChanged => {
                self.check_auth();
            }
        }
    }

    /// Publish an event on behalf of a collaborator (the API gateway).
    pub fn notify(&self, event: SessionEvent) {
        self.emit(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Cached token; may be stale until the next `check_auth`.
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Token only if the cached state says it is usable.
    pub fn bearer_token(&self) -> Option<String> {
        let inner = self.lock();
        if inner.authenticated {
            inner.token.clone()
        } else {
            None
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    /// False when the session only lives in memory, either by configuration
    /// or because storage failed.
    pub fn is_persistent(&self) -> bool {
        let inner = self.lock();
        !inner.degraded && inner.store.is_persistent()
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.token().and_then(|t| decode_claims(&t).ok())
    }

    /// Time left before the current token expires, if there is one.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        let claims = self.claims()?;
        let remaining_ms = claims.expires_at_ms() - self.clock.now_ms();
        Some(Duration::milliseconds(remaining_ms.max(0)))
    }
}
