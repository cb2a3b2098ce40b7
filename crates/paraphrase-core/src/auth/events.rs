//! Session signals and notifications.
//!
//! Inbound `AuthSignal`s travel over an mpsc channel from whoever learned
//! something about the credential (the API gateway, a storage watcher) to the
//! session's `ExpiryWatcher`. Outbound `SessionEvent`s are broadcast by the
//! session to any number of UI subscribers.

use tokio::sync::mpsc;
use tracing::debug;

/// Capacity of the session event broadcast channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change to the credential observed outside the session manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    /// A new token was issued (e.g. after a successful credential exchange).
    ExternalLogin(String),
    /// The current token was invalidated (e.g. the backend answered 401).
    ExternalLogout,
    /// The persisted entry may have been changed by another process.
    StorageChanged,
}

/// Notification published by the session for UI shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored and the session is authenticated.
    Established,
    /// The session was cleared by a logout.
    Cleared,
    /// A stored token was found expired or undecodable and evicted.
    Expired,
    /// The backend rejected the credential; the user should re-authenticate.
    Unauthorized,
}

pub type SignalReceiver = mpsc::UnboundedReceiver<AuthSignal>;

/// Cloneable handle for sending `AuthSignal`s to the session.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<AuthSignal>,
}

impl SignalSender {
    /// Send a signal. Returns false when nobody is listening anymore.
    pub fn send(&self, signal: AuthSignal) -> bool {
        debug!(?signal, "Sending auth signal");
        self.tx.send(signal).is_ok()
    }
}

/// Create the signal channel connecting producers to the session.
pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_sender_delivers_in_order() {
        let (tx, mut rx) = signal_channel();
        assert!(tx.send(AuthSignal::ExternalLogin("t".to_string())));
        assert!(tx.clone().send(AuthSignal::ExternalLogout));

        assert_eq!(rx.try_recv().ok(), Some(AuthSignal::ExternalLogin("t".to_string())));
        assert_eq!(rx.try_recv().ok(), Some(AuthSignal::ExternalLogout));
    }

    #[test]
    fn test_signal_sender_reports_closed_channel() {
        let (tx, rx) = signal_channel();
        drop(rx);
        assert!(!tx.send(AuthSignal::StorageChanged));
    }
}
