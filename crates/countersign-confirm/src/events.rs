//! Confirmation lifecycle events.
//!
//! The plugin emits an event at every state transition so observers (an
//! audit trail, metrics, a status line) can follow the flow without the
//! plugin knowing about any particular sink. Events are broadcast; a bus
//! with no subscribers drops them silently.

use chrono::{DateTime, Utc};
use countersign_core::{ConfirmationId, Resolution};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Metadata attached to every emitted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this emission.
    pub event_id: Uuid,
    /// Which component emitted the event.
    pub source: String,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

impl EventMetadata {
    /// Create metadata stamped with the current time.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            source: source.into(),
            timestamp: Utc::now(),
        }
    }
}

/// One state transition in a confirmation round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ConfirmEvent {
    /// A prompt was handed to the user surface.
    PromptIssued {
        /// Emission metadata.
        metadata: EventMetadata,
        /// The confirmation the prompt belongs to.
        id: ConfirmationId,
        /// Configured timeout in milliseconds, zero when disabled.
        timeout_ms: u64,
    },
    /// A timeout guard was armed against the confirmation.
    GuardArmed {
        /// Emission metadata.
        metadata: EventMetadata,
        /// The guarded confirmation.
        id: ConfirmationId,
        /// Deadline in milliseconds.
        timeout_ms: u64,
    },
    /// The guard was released after the confirmation resolved.
    GuardDisarmed {
        /// Emission metadata.
        metadata: EventMetadata,
        /// The confirmation whose guard was released.
        id: ConfirmationId,
    },
    /// The confirmation reached a terminal state.
    Resolved {
        /// Emission metadata.
        metadata: EventMetadata,
        /// The resolved confirmation.
        id: ConfirmationId,
        /// The terminal state that was recorded.
        resolution: Resolution,
    },
    /// The hook produced its outcome for the pipeline.
    OutcomeProduced {
        /// Emission metadata.
        metadata: EventMetadata,
        /// The confirmation the outcome derives from.
        id: ConfirmationId,
        /// Whether the pipeline proceeds to signing.
        proceed: bool,
    },
}

impl ConfirmEvent {
    /// Snake-case name of the event variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PromptIssued { .. } => "prompt_issued",
            Self::GuardArmed { .. } => "guard_armed",
            Self::GuardDisarmed { .. } => "guard_disarmed",
            Self::Resolved { .. } => "resolved",
            Self::OutcomeProduced { .. } => "outcome_produced",
        }
    }

    /// The confirmation this event belongs to.
    #[must_use]
    pub fn confirmation_id(&self) -> &ConfirmationId {
        match self {
            Self::PromptIssued { id, .. }
            | Self::GuardArmed { id, .. }
            | Self::GuardDisarmed { id, .. }
            | Self::Resolved { id, .. }
            | Self::OutcomeProduced { id, .. } => id,
        }
    }
}

/// Broadcasts confirmation events to any number of subscribers.
///
/// Clones share the same channel.
#[derive(Debug, Clone)]
pub struct ConfirmEvents {
    sender: broadcast::Sender<Arc<ConfirmEvent>>,
}

impl ConfirmEvents {
    /// Create a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of receivers that got the event.
    pub fn publish(&self, event: ConfirmEvent) -> usize {
        let event = Arc::new(event);
        match self.sender.send(Arc::clone(&event)) {
            Ok(count) => {
                tracing::trace!(
                    event_type = event.event_type(),
                    receiver_count = count,
                    "event published"
                );
                count
            },
            Err(_) => {
                // No receivers; that is fine.
                tracing::trace!(event_type = event.event_type(), "no receivers for event");
                0
            },
        }
    }

    /// Subscribe to all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ConfirmEvent>> {
        self.sender.subscribe()
    }

    /// The number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ConfirmEvents {
    fn default() -> Self {
        Self::new()
    }
}
