//! Deferred cancellation of pending confirmations.

use countersign_core::Confirmation;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::text::render_template;

/// Cancels a [`Confirmation`] after a deadline unless released first.
///
/// Exactly one of two things happens for any guard: it fires and cancels
/// its confirmation, or it is disarmed before the deadline. The timer and
/// the disarm signal race inside one spawned task with the disarm branch
/// polled first, so disarming strictly before the deadline always wins.
/// Dropping the guard disarms it, so no timer outlives its invocation.
#[derive(Debug)]
pub struct TimeoutGuard {
    token: CancellationToken,
}

impl TimeoutGuard {
    /// Arm a guard that cancels `confirmation` after `duration`.
    ///
    /// `reason_template` may reference `{{timeout}}`; it is rendered with
    /// the duration in whole seconds and recorded as the cancellation
    /// reason if the guard fires.
    #[must_use]
    pub fn arm(confirmation: Confirmation, duration: Duration, reason_template: &str) -> Self {
        let token = CancellationToken::new();
        let armed = token.clone();
        let reason = render_template(reason_template, duration);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = armed.cancelled() => {
                    tracing::trace!(id = %confirmation.id(), "timeout guard released");
                }
                () = tokio::time::sleep(duration) => {
                    tracing::debug!(
                        id = %confirmation.id(),
                        timeout_secs = duration.as_secs(),
                        "timeout guard fired, canceling confirmation"
                    );
                    confirmation.cancel(reason);
                }
            }
        });
        Self { token }
    }

    /// Release the guard so it can never fire.
    ///
    /// Idempotent, and safe to call after the deadline has already passed.
    pub fn disarm(&self) {
        self.token.cancel();
    }
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
