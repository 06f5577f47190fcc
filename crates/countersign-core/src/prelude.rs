//! Convenient re-exports for pipeline hosts and plugin implementations.

pub use crate::confirmation::{Confirmation, ConfirmationId, ConfirmationResolver, Resolution};
pub use crate::error::{TransactError, TransactResult};
pub use crate::prompt::{PromptElement, PromptSpec, UserPrompt};
pub use crate::transact::{
    HookOutcome, HookPhase, SigningRequest, TransactContext, TransactHook, TransactPlugin,
};
