//! Terminal-state to pipeline-outcome mapping.

use countersign_core::{HookOutcome, Resolution, SigningRequest, TransactError};

/// Generic message for a decline the policy does not tolerate.
const DECLINE_MESSAGE: &str = "user declined to sign the transaction";

/// Decides how a resolved confirmation maps onto the pipeline.
///
/// Cancellation always halts the pipeline: it is an authoritative external
/// abort signal (a timeout or a programmatic override) and is never
/// absorbed. A decline is a user choice and the only outcome subject to
/// configurable tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPolicy {
    /// Proceed with signing when the user declines.
    pub continue_on_decline: bool,
}

impl ResolutionPolicy {
    /// Create a policy with the given decline tolerance.
    #[must_use]
    pub fn new(continue_on_decline: bool) -> Self {
        Self {
            continue_on_decline,
        }
    }

    /// Map a terminal state onto the outcome for `request`.
    ///
    /// Pure: no side effects, no awaits.
    #[must_use]
    pub fn outcome(&self, resolution: Resolution, request: SigningRequest) -> HookOutcome {
        match resolution {
            Resolution::Accepted => HookOutcome::Continue(request),
            Resolution::Canceled { reason } => {
                HookOutcome::Abort(TransactError::Canceled { reason })
            },
            Resolution::Rejected if self.continue_on_decline => HookOutcome::Continue(request),
            Resolution::Rejected => HookOutcome::Abort(TransactError::Rejected {
                message: DECLINE_MESSAGE.to_string(),
            }),
        }
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_request() -> SigningRequest {
        SigningRequest::new("mainnet", "transfer", json!({}))
    }

    #[test]
    fn test_accepted_always_continues() {
        for tolerant in [true, false] {
            let outcome =
                ResolutionPolicy::new(tolerant).outcome(Resolution::Accepted, make_request());
            assert!(outcome.is_continue());
        }
    }

    #[test]
    fn test_canceled_always_aborts() {
        for tolerant in [true, false] {
            let outcome = ResolutionPolicy::new(tolerant).outcome(
                Resolution::Canceled {
                    reason: "timed out after 5 seconds".to_string(),
                },
                make_request(),
            );
            let err = outcome.abort_error().expect("cancellation must abort");
            assert!(err.is_canceled());
            assert_eq!(err.cancel_reason(), Some("timed out after 5 seconds"));
        }
    }

    #[test]
    fn test_rejected_continues_when_tolerated() {
        let outcome = ResolutionPolicy::new(true).outcome(Resolution::Rejected, make_request());
        assert!(outcome.is_continue());
    }

    #[test]
    fn test_rejected_aborts_when_not_tolerated() {
        let outcome = ResolutionPolicy::new(false).outcome(Resolution::Rejected, make_request());
        let err = outcome.abort_error().expect("decline must abort");
        assert!(err.is_rejected());
        assert!(err.to_string().contains("declined"));
    }

    #[test]
    fn test_continue_threads_the_request_through_unmodified() {
        let request = make_request();
        let id = request.id;
        match ResolutionPolicy::default().outcome(Resolution::Accepted, request) {
            HookOutcome::Continue(r) => assert_eq!(r.id, id),
            HookOutcome::Abort(e) => panic!("unexpected abort: {e}"),
        }
    }
}
