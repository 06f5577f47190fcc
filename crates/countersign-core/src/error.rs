use thiserror::Error;

/// Errors surfaced to the signing pipeline by plugins and hooks.
#[derive(Debug, Clone, Error)]
pub enum TransactError {
    /// The confirmation was canceled before the user resolved it.
    #[error("confirmation canceled: {reason}")]
    Canceled {
        /// Why the confirmation was canceled.
        reason: String,
    },

    /// The user declined the confirmation.
    #[error("confirmation declined: {message}")]
    Rejected {
        /// Description of the declined confirmation.
        message: String,
    },

    /// A prompt was required but the pipeline is not set up to present one.
    #[error("configuration error: {message}")]
    Configuration {
        /// What is missing or misconfigured.
        message: String,
    },
}

impl TransactError {
    /// Check if this is a cancellation.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    /// Check if this is a user decline.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if this is a configuration failure.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// The cancellation reason, if this is a cancellation.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        match self {
            Self::Canceled { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Result type for pipeline and hook operations.
pub type TransactResult<T> = Result<T, TransactError>;
