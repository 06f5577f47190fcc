//! Countersign Confirm - interactive confirmation for the signing pipeline.
//!
//! This crate provides the plugin that pauses the pipeline's before-sign
//! phase, prompts the user through the attached surface, optionally races
//! the prompt against a timeout, and maps the terminal state onto a
//! continue/abort outcome:
//!
//! | Terminal state | `continue_on_decline` | Outcome |
//! |---|---|---|
//! | Accepted | — | proceed |
//! | Canceled | — | abort, always |
//! | Rejected | `true` | proceed |
//! | Rejected | `false` | abort |
//!
//! # Example
//!
//! ```rust,ignore
//! use countersign_confirm::{ConfirmOptions, ConfirmPlugin};
//! use countersign_core::{HookPhase, TransactContext};
//!
//! let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_timeout_ms(5_000));
//! let mut ctx = TransactContext::new().with_ui(surface);
//! ctx.install(&plugin);
//!
//! let outcome = ctx.run_hooks(HookPhase::BeforeSign, request).await?;
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod events;
pub mod guard;
pub mod options;
pub mod plugin;
pub mod policy;
pub mod text;

pub use events::{ConfirmEvent, ConfirmEvents, DEFAULT_CHANNEL_CAPACITY, EventMetadata};
pub use guard::TimeoutGuard;
pub use options::ConfirmOptions;
pub use plugin::{ConfirmPlugin, PLUGIN_ID};
pub use policy::ResolutionPolicy;
pub use text::Catalog;
