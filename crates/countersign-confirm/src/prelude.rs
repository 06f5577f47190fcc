//! Convenient re-exports for hosts embedding the confirmation plugin.

pub use crate::events::{ConfirmEvent, ConfirmEvents, EventMetadata};
pub use crate::guard::TimeoutGuard;
pub use crate::options::ConfirmOptions;
pub use crate::plugin::{ConfirmPlugin, PLUGIN_ID};
pub use crate::policy::ResolutionPolicy;

pub use countersign_core::prelude::*;
