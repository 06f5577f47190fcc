//! Transaction pipeline context, hook registration, and the driver loop.
//!
//! A [`TransactContext`] is assembled once per signing pipeline: the host
//! attaches a prompt surface, installs its plugins, then drives each
//! [`HookPhase`] in order via [`TransactContext::run_hooks`]. Plugins are
//! capability implementations — they receive the context at registration
//! time and add hooks, nothing is inherited.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::confirmation::Confirmation;
use crate::error::{TransactError, TransactResult};
use crate::prompt::{PromptSpec, UserPrompt};

/// A transaction awaiting signature.
///
/// The payload is opaque to hooks; they inspect the summary and thread the
/// request through either untouched or with deliberate modifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningRequest {
    /// Identifier assigned when the request entered the pipeline.
    pub id: Uuid,
    /// Chain or network the transaction targets.
    pub chain: String,
    /// Human-readable summary of what will be signed.
    pub summary: String,
    /// Opaque transaction payload, as the wallet produced it.
    pub payload: serde_json::Value,
}

impl SigningRequest {
    /// Create a request for `chain` with the given summary and payload.
    #[must_use]
    pub fn new(
        chain: impl Into<String>,
        summary: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            chain: chain.into(),
            summary: summary.into(),
            payload,
        }
    }
}

/// Pipeline phases a plugin can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Before the wallet signs the request.
    BeforeSign,
    /// After signing, before broadcast.
    AfterSign,
    /// After the signed transaction was broadcast.
    AfterBroadcast,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeSign => write!(f, "before_sign"),
            Self::AfterSign => write!(f, "after_sign"),
            Self::AfterBroadcast => write!(f, "after_broadcast"),
        }
    }
}

/// What a hook decided about the in-flight request.
#[derive(Debug)]
pub enum HookOutcome {
    /// Proceed with the (possibly updated) request.
    Continue(SigningRequest),
    /// Halt the pipeline with the given error.
    Abort(TransactError),
}

impl HookOutcome {
    /// Check if the pipeline should proceed.
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Check if the pipeline should halt.
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }

    /// The abort error, if the pipeline should halt.
    #[must_use]
    pub fn abort_error(&self) -> Option<&TransactError> {
        match self {
            Self::Abort(err) => Some(err),
            Self::Continue(_) => None,
        }
    }
}

/// A hook invoked at one pipeline phase.
///
/// Returning `Ok(HookOutcome::Abort(_))` is a deliberate halt decision;
/// returning `Err(_)` means the hook itself could not run (for example a
/// misconfigured pipeline). The driver stops at either.
#[async_trait]
pub trait TransactHook: Send + Sync {
    /// Inspect or gate `request`.
    ///
    /// # Errors
    ///
    /// Implementations return an error only when the hook cannot do its
    /// job at all, as opposed to deciding the pipeline should halt.
    async fn call(
        &self,
        request: SigningRequest,
        ctx: &TransactContext,
    ) -> TransactResult<HookOutcome>;
}

/// Capability implemented by plugins that participate in the pipeline.
pub trait TransactPlugin: Send + Sync {
    /// Stable identifier, used for tracing and copy lookup.
    fn id(&self) -> &str;

    /// Register any hooks this plugin needs.
    fn register(&self, ctx: &mut TransactContext);
}

/// State shared across one signing pipeline: the prompt surface and the
/// hooks registered for each phase.
pub struct TransactContext {
    /// The attached prompt surface, if any.
    ui: Option<Arc<dyn UserPrompt>>,
    /// Hooks per phase, in registration order.
    hooks: HashMap<HookPhase, Vec<Arc<dyn TransactHook>>>,
}

impl TransactContext {
    /// Create a context with no surface and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ui: None,
            hooks: HashMap::new(),
        }
    }

    /// Attach a prompt surface.
    #[must_use]
    pub fn with_ui(mut self, ui: Arc<dyn UserPrompt>) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Whether a prompt surface is attached.
    #[must_use]
    pub fn has_ui(&self) -> bool {
        self.ui.is_some()
    }

    /// Register `hook` for `phase`. Hooks run in registration order.
    pub fn add_hook(&mut self, phase: HookPhase, hook: Arc<dyn TransactHook>) {
        self.hooks.entry(phase).or_default().push(hook);
    }

    /// Number of hooks registered for `phase`.
    #[must_use]
    pub fn hook_count(&self, phase: HookPhase) -> usize {
        self.hooks.get(&phase).map_or(0, Vec::len)
    }

    /// Let `plugin` register its hooks.
    pub fn install(&mut self, plugin: &dyn TransactPlugin) {
        tracing::debug!(plugin = plugin.id(), "installing transact plugin");
        plugin.register(self);
    }

    /// Issue a confirmation prompt through the attached surface.
    ///
    /// Raised synchronously so a misconfigured pipeline fails before any
    /// request handle exists.
    ///
    /// # Errors
    ///
    /// Returns [`TransactError::Configuration`] when no surface is
    /// attached or `spec` carries nothing to render.
    pub fn prompt_user(&self, spec: PromptSpec) -> TransactResult<Confirmation> {
        if spec.is_empty() {
            return Err(TransactError::Configuration {
                message: "prompt spec has no title, body, or elements".to_string(),
            });
        }
        match &self.ui {
            Some(ui) => Ok(ui.prompt(spec)),
            None => Err(TransactError::Configuration {
                message: "no user interface attached to the signing pipeline".to_string(),
            }),
        }
    }

    /// Drive every hook registered for `phase`, threading the request
    /// through in registration order.
    ///
    /// Stops at the first [`HookOutcome::Abort`] or hook failure.
    ///
    /// # Errors
    ///
    /// Propagates the first hook failure unaltered.
    pub async fn run_hooks(
        &self,
        phase: HookPhase,
        request: SigningRequest,
    ) -> TransactResult<HookOutcome> {
        let Some(hooks) = self.hooks.get(&phase) else {
            return Ok(HookOutcome::Continue(request));
        };
        let mut current = request;
        for hook in hooks {
            match hook.call(current, self).await? {
                HookOutcome::Continue(next) => current = next,
                abort @ HookOutcome::Abort(_) => {
                    tracing::debug!(%phase, "hook aborted the pipeline");
                    return Ok(abort);
                },
            }
        }
        Ok(HookOutcome::Continue(current))
    }
}

impl Default for TransactContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransactContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactContext")
            .field("has_ui", &self.ui.is_some())
            .field("phases_hooked", &self.hooks.len())
            .finish_non_exhaustive()
    }
}
