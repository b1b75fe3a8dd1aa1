//! The resend countdown task.
//!
//! At most one runs per session: dispatching a code cancels the previous
//! task before spawning a new one, and closing the wizard cancels it.

use std::sync::Weak;
use std::time::Duration;

use alumni_core::entity::SubmissionEntity;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::session::WizardSession;

const TICK: Duration = Duration::from_secs(1);

/// Decrement the session countdown once per second, whatever step the
/// wizard is on, until it reaches zero or `cancel` fires. The code it
/// tracks expires on the server regardless of where the user is.
pub(crate) fn spawn_countdown<E: SubmissionEntity>(
    session: Weak<Mutex<WizardSession<E>>>,
    cancel: CancellationToken,
    session_id: Uuid,
) {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + TICK, TICK);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(%session_id, "Countdown cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let Some(session) = session.upgrade() else {
                        break;
                    };
                    let mut s = session.lock().await;
                    // Replaced or closed while waiting for the lock.
                    if cancel.is_cancelled() || s.closed {
                        break;
                    }
                    if s.countdown.tick() {
                        tracing::debug!(%session_id, "Countdown finished, resend enabled");
                        s.timer = None;
                        break;
                    }
                }
            }
        }
    });
}
