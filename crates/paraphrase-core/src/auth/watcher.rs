//! Background task keeping the session in step with signals and the clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::events::SignalReceiver;
use super::session::SessionManager;

/// Default re-validation period when no token expiry is sooner.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct ExpiryWatcher;

impl ExpiryWatcher {
    /// Spawn the watcher. It applies every incoming signal and re-checks the
    /// session at least every `poll_interval`, or right at the token's expiry
    /// when that comes first. Stops once all signal senders are dropped.
    pub fn spawn(
        session: Arc<SessionManager>,
        mut signals: SignalReceiver,
        poll_interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(poll_secs = poll_interval.as_secs(), "Expiry watcher started");
            loop {
                let wait = Self::next_wait(&session, poll_interval);
                tokio::select! {
                    signal = signals.recv() => match signal {
                        Some(signal) => session.apply(signal),
                        None => break,
                    },
                    _ = tokio::time::sleep(wait) => {
                        debug!(wait_ms = wait.as_millis() as u64, "Re-checking session");
                        session.check_auth();
                    }
                }
            }
            info!("Expiry watcher stopped");
        })
    }

    fn next_wait(session: &SessionManager, poll_interval: Duration) -> Duration {
        match session.time_until_expiry().and_then(|d| d.to_std().ok()) {
            Some(remaining) if session.is_authenticated() => remaining.min(poll_interval),
            _ => poll_interval,
        }
    }
}
