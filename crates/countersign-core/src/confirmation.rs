//! Cancelable confirmation requests.
//!
//! A [`Confirmation`] represents one outstanding user confirmation issued
//! through a [`UserPrompt`](crate::UserPrompt) surface. The surface records
//! the user's choice through the [`ConfirmationResolver`] half of the pair;
//! any holder of the handle may cancel. The terminal state is written at
//! most once: the first transition wins and every later attempt is a no-op.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use uuid::Uuid;

/// Unique identifier for a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfirmationId(pub Uuid);

impl ConfirmationId {
    /// Create a new random confirmation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConfirmationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfirmationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "confirm:{}", self.0)
    }
}

/// Terminal state of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Resolution {
    /// The user accepted the prompt.
    Accepted,
    /// The user declined the prompt.
    Rejected,
    /// The confirmation was canceled before the user resolved it.
    Canceled {
        /// Why the confirmation was canceled.
        reason: String,
    },
}

impl Resolution {
    /// Check if the user accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Check if the user declined.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Check if the confirmation was canceled.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    /// The cancellation reason, if canceled.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        match self {
            Self::Canceled { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
            Self::Canceled { reason } => write!(f, "canceled: {reason}"),
        }
    }
}

/// State slot shared by the handle and resolver halves.
///
/// Written at most once; `notify` wakes every waiter on the winning write.
#[derive(Debug)]
struct Shared {
    id: ConfirmationId,
    state: Mutex<Option<Resolution>>,
    notify: Notify,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, Option<Resolution>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `resolution` if the slot is still empty.
    ///
    /// Returns whether this call performed the transition.
    fn resolve(&self, resolution: Resolution) -> bool {
        let mut state = self.lock_state();
        if state.is_some() {
            tracing::trace!(id = %self.id, ignored = %resolution, "confirmation already resolved");
            return false;
        }
        *state = Some(resolution);
        drop(state);
        self.notify.notify_waiters();
        true
    }
}

/// Cancelable handle to one outstanding user confirmation.
///
/// Returned by [`TransactContext::prompt_user`](crate::TransactContext::prompt_user).
/// Clones share the same underlying request, so a timer task can hold one
/// clone while the orchestrator awaits another.
#[derive(Debug, Clone)]
pub struct Confirmation {
    shared: Arc<Shared>,
}

impl Confirmation {
    /// Create a connected handle/resolver pair.
    ///
    /// The handle side awaits and may cancel; the resolver side is handed
    /// to the prompt surface to record the user's choice.
    #[must_use]
    pub fn pair() -> (Self, ConfirmationResolver) {
        let shared = Arc::new(Shared {
            id: ConfirmationId::new(),
            state: Mutex::new(None),
            notify: Notify::new(),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            ConfirmationResolver { shared },
        )
    }

    /// This confirmation's identity.
    #[must_use]
    pub fn id(&self) -> ConfirmationId {
        self.shared.id.clone()
    }

    /// Check whether no terminal state has been recorded yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.shared.lock_state().is_none()
    }

    /// The recorded terminal state, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<Resolution> {
        self.shared.lock_state().clone()
    }

    /// Request cancellation with `reason`.
    ///
    /// No effect once a terminal state has been recorded.
    pub fn cancel(&self, reason: impl Into<String>) {
        self.shared.resolve(Resolution::Canceled {
            reason: reason.into(),
        });
    }

    /// Wait until a terminal state is recorded and return it.
    ///
    /// The notify future is enabled before the state check, so a
    /// transition landing between the check and the await cannot be
    /// missed.
    pub async fn resolution(&self) -> Resolution {
        loop {
            let mut notified = pin!(self.shared.notify.notified());
            notified.as_mut().enable();
            if let Some(resolution) = self.resolved() {
                return resolution;
            }
            notified.await;
        }
    }
}

/// Resolver half of a confirmation, held by the prompt surface.
///
/// Each reporting method consumes the resolver: the surface reports exactly
/// one user action. Dropping the resolver without reporting cancels the
/// confirmation, so an abandoned prompt fails closed instead of hanging.
#[derive(Debug)]
pub struct ConfirmationResolver {
    shared: Arc<Shared>,
}

impl ConfirmationResolver {
    /// The confirmation this resolver feeds.
    #[must_use]
    pub fn id(&self) -> ConfirmationId {
        self.shared.id.clone()
    }

    /// Record that the user accepted.
    pub fn accept(self) {
        self.shared.resolve(Resolution::Accepted);
    }

    /// Record that the user declined.
    pub fn reject(self) {
        self.shared.resolve(Resolution::Rejected);
    }

    /// Cancel on behalf of the surface, e.g. when its window is closed.
    pub fn cancel(self, reason: impl Into<String>) {
        self.shared.resolve(Resolution::Canceled {
            reason: reason.into(),
        });
    }
}

impl Drop for ConfirmationResolver {
    fn drop(&mut self) {
        // No-op when a choice was already recorded.
        self.shared.resolve(Resolution::Canceled {
            reason: "prompt surface went away before the user responded".to_string(),
        });
    }
}
