//! Countersign Core - contracts for the transaction-signing pipeline.
//!
//! This crate defines the types a signing pipeline and its plugins share:
//!
//! - [`Confirmation`] / [`ConfirmationResolver`] — one cancelable user
//!   confirmation with a single-writer terminal state
//! - [`UserPrompt`] / [`PromptSpec`] — the capability a user-facing
//!   surface implements to render prompts
//! - [`TransactContext`] — hook registration and the per-phase driver
//! - [`TransactError`] — the error taxonomy surfaced to the pipeline
//!
//! # Example
//!
//! ```
//! use countersign_core::{Confirmation, Resolution};
//!
//! let (confirmation, resolver) = Confirmation::pair();
//! assert!(confirmation.is_pending());
//!
//! // The surface records the user's choice; the first transition wins.
//! resolver.accept();
//! confirmation.cancel("too late");
//! assert_eq!(confirmation.resolved(), Some(Resolution::Accepted));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod confirmation;
/// Error types and results for the signing pipeline.
pub mod error;
pub mod prompt;
pub mod transact;

pub use confirmation::{Confirmation, ConfirmationId, ConfirmationResolver, Resolution};
pub use error::{TransactError, TransactResult};
pub use prompt::{PromptElement, PromptSpec, UserPrompt};
pub use transact::{
    HookOutcome, HookPhase, SigningRequest, TransactContext, TransactHook, TransactPlugin,
};
