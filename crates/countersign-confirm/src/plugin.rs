//! The confirmation plugin.
//!
//! [`ConfirmPlugin`] gates the before-sign phase behind an interactive
//! user confirmation. One invocation is a single accept/decline/cancel
//! round-trip:
//!
//! 1. Pass through immediately when prompting is disabled.
//! 2. Build the prompt copy (with a timeout disclosure when one is
//!    configured) and issue it through the pipeline's surface. A missing
//!    surface is a fatal configuration error raised at issue time, not a
//!    silent pass-through.
//! 3. Arm a [`TimeoutGuard`] when a timeout is configured.
//! 4. Await the terminal state.
//! 5. Release the guard, apply the [`ResolutionPolicy`], return the
//!    outcome.
//!
//! There are no retries: a rejected or canceled confirmation is never
//! re-prompted.

use async_trait::async_trait;
use std::sync::Arc;

use countersign_core::{
    HookOutcome, HookPhase, PromptElement, PromptSpec, SigningRequest, TransactContext,
    TransactHook, TransactPlugin, TransactResult,
};

use crate::events::{ConfirmEvent, ConfirmEvents, EventMetadata};
use crate::guard::TimeoutGuard;
use crate::options::ConfirmOptions;
use crate::policy::ResolutionPolicy;
use crate::text::{self, Catalog};

/// Stable plugin identifier.
pub const PLUGIN_ID: &str = "countersign-confirm";

/// Gates the before-sign phase behind an interactive user confirmation.
///
/// Cheap to clone; clones share options, copy catalog, and event bus. The
/// plugin registers itself as its own before-sign hook.
#[derive(Debug, Clone)]
pub struct ConfirmPlugin {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    options: ConfirmOptions,
    catalog: Catalog,
    events: ConfirmEvents,
}

impl ConfirmPlugin {
    /// Create a plugin with the given options.
    #[must_use]
    pub fn new(options: ConfirmOptions) -> Self {
        let catalog = Catalog::with_overrides(&options.translations);
        Self {
            inner: Arc::new(Inner {
                options,
                catalog,
                events: ConfirmEvents::new(),
            }),
        }
    }

    /// The options this plugin was built with.
    #[must_use]
    pub fn options(&self) -> &ConfirmOptions {
        &self.inner.options
    }

    /// The bus this plugin publishes lifecycle events on.
    #[must_use]
    pub fn events(&self) -> &ConfirmEvents {
        &self.inner.events
    }

    /// Build the prompt spec for one invocation.
    ///
    /// The body discloses the automatic cancellation when a timeout is
    /// configured.
    fn prompt_spec(&self) -> PromptSpec {
        let catalog = &self.inner.catalog;
        let mut body = catalog.template(text::BODY).to_string();
        if let Some(timeout) = self.inner.options.timeout() {
            body.push(' ');
            body.push_str(&catalog.render(text::TIMEOUT, timeout));
        }
        PromptSpec::new(catalog.template(text::TITLE), body)
            .with_element(PromptElement::Accept)
            .with_element(PromptElement::Decline)
    }

    fn publish(&self, event: ConfirmEvent) {
        self.inner.events.publish(event);
    }

    /// One confirmation round-trip.
    async fn before_sign(
        &self,
        request: SigningRequest,
        ctx: &TransactContext,
    ) -> TransactResult<HookOutcome> {
        let options = &self.inner.options;
        if !options.prompt {
            tracing::trace!(plugin = PLUGIN_ID, "prompting disabled, passing through");
            return Ok(HookOutcome::Continue(request));
        }

        let confirmation = ctx.prompt_user(self.prompt_spec())?;
        let id = confirmation.id();
        tracing::debug!(
            plugin = PLUGIN_ID,
            %id,
            request = %request.id,
            "confirmation prompt issued"
        );
        self.publish(ConfirmEvent::PromptIssued {
            metadata: EventMetadata::new(PLUGIN_ID),
            id: id.clone(),
            timeout_ms: options.timeout_ms,
        });

        let guard = options.timeout().map(|timeout| {
            self.publish(ConfirmEvent::GuardArmed {
                metadata: EventMetadata::new(PLUGIN_ID),
                id: id.clone(),
                timeout_ms: options.timeout_ms,
            });
            TimeoutGuard::arm(
                confirmation.clone(),
                timeout,
                self.inner.catalog.template(text::TIMEOUT_TRIGGER),
            )
        });

        let resolution = confirmation.resolution().await;

        // Release the timer before the outcome is decided; Drop covers the
        // paths this method never reaches.
        if let Some(guard) = &guard {
            guard.disarm();
            self.publish(ConfirmEvent::GuardDisarmed {
                metadata: EventMetadata::new(PLUGIN_ID),
                id: id.clone(),
            });
        }
        self.publish(ConfirmEvent::Resolved {
            metadata: EventMetadata::new(PLUGIN_ID),
            id: id.clone(),
            resolution: resolution.clone(),
        });

        let outcome =
            ResolutionPolicy::new(options.continue_on_decline).outcome(resolution, request);
        match &outcome {
            HookOutcome::Continue(_) => {
                tracing::debug!(plugin = PLUGIN_ID, %id, "pipeline proceeds to signing");
            },
            HookOutcome::Abort(err) => {
                tracing::warn!(plugin = PLUGIN_ID, %id, error = %err, "pipeline halted");
            },
        }
        self.publish(ConfirmEvent::OutcomeProduced {
            metadata: EventMetadata::new(PLUGIN_ID),
            id,
            proceed: outcome.is_continue(),
        });
        Ok(outcome)
    }
}

impl Default for ConfirmPlugin {
    fn default() -> Self {
        Self::new(ConfirmOptions::default())
    }
}

impl TransactPlugin for ConfirmPlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn register(&self, ctx: &mut TransactContext) {
        ctx.add_hook(HookPhase::BeforeSign, Arc::new(self.clone()));
        tracing::debug!(plugin = PLUGIN_ID, "registered before-sign confirmation hook");
    }
}

#[async_trait]
impl TransactHook for ConfirmPlugin {
    async fn call(
        &self,
        request: SigningRequest,
        ctx: &TransactContext,
    ) -> TransactResult<HookOutcome> {
        self.before_sign(request, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countersign_core::{Confirmation, ConfirmationResolver, UserPrompt};
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn make_request() -> SigningRequest {
        SigningRequest::new("mainnet", "transfer 1.0 TOKEN to alice", json!({}))
    }

    /// A surface that accepts every prompt immediately.
    #[derive(Default)]
    struct AcceptingSurface {
        prompts: AtomicUsize,
    }

    impl UserPrompt for AcceptingSurface {
        fn prompt(&self, _spec: PromptSpec) -> Confirmation {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            let (confirmation, resolver) = Confirmation::pair();
            resolver.accept();
            confirmation
        }
    }

    /// A surface that declines every prompt immediately.
    struct DecliningSurface;

    impl UserPrompt for DecliningSurface {
        fn prompt(&self, _spec: PromptSpec) -> Confirmation {
            let (confirmation, resolver) = Confirmation::pair();
            resolver.reject();
            confirmation
        }
    }

    /// A surface that cancels every prompt, like a closed wallet window.
    struct CancelingSurface;

    impl UserPrompt for CancelingSurface {
        fn prompt(&self, _spec: PromptSpec) -> Confirmation {
            let (confirmation, resolver) = Confirmation::pair();
            resolver.cancel("wallet window closed");
            confirmation
        }
    }

    /// A surface that never responds; resolvers are parked so the prompt
    /// stays pending.
    #[derive(Default)]
    struct SilentSurface {
        parked: Mutex<Vec<ConfirmationResolver>>,
    }

    impl UserPrompt for SilentSurface {
        fn prompt(&self, _spec: PromptSpec) -> Confirmation {
            let (confirmation, resolver) = Confirmation::pair();
            self.parked.lock().unwrap().push(resolver);
            confirmation
        }
    }

    /// A surface that accepts after a fixed delay.
    struct SlowAcceptSurface {
        delay: Duration,
    }

    impl UserPrompt for SlowAcceptSurface {
        fn prompt(&self, _spec: PromptSpec) -> Confirmation {
            let (confirmation, resolver) = Confirmation::pair();
            let delay = self.delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                resolver.accept();
            });
            confirmation
        }
    }

    fn context_with(surface: Arc<dyn UserPrompt>, plugin: &ConfirmPlugin) -> TransactContext {
        let mut ctx = TransactContext::new().with_ui(surface);
        ctx.install(plugin);
        ctx
    }

    // -----------------------------------------------------------------------
    // Pass-through and configuration
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_disabled_prompting_passes_through_without_touching_the_surface() {
        let surface = Arc::new(AcceptingSurface::default());
        let plugin = ConfirmPlugin::new(ConfirmOptions::passthrough());
        let ctx = context_with(Arc::clone(&surface) as Arc<dyn UserPrompt>, &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();

        assert!(outcome.is_continue());
        assert_eq!(surface.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_prompting_needs_no_surface_at_all() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::passthrough());
        let mut ctx = TransactContext::new();
        ctx.install(&plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        assert!(outcome.is_continue());
    }

    #[tokio::test]
    async fn test_missing_surface_is_a_fatal_configuration_error() {
        let plugin = ConfirmPlugin::default();
        let mut ctx = TransactContext::new();
        ctx.install(&plugin);

        let err = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    // -----------------------------------------------------------------------
    // Resolution outcomes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_accept_continues() {
        let plugin = ConfirmPlugin::default();
        let ctx = context_with(Arc::new(AcceptingSurface::default()), &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        assert!(outcome.is_continue());
    }

    #[tokio::test]
    async fn test_decline_continues_when_tolerated() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_continue_on_decline(true));
        let ctx = context_with(Arc::new(DecliningSurface), &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        assert!(outcome.is_continue());
    }

    #[tokio::test]
    async fn test_decline_aborts_when_not_tolerated() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_continue_on_decline(false));
        let ctx = context_with(Arc::new(DecliningSurface), &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        assert!(outcome.abort_error().unwrap().is_rejected());
    }

    #[tokio::test]
    async fn test_cancel_aborts_even_when_declines_are_tolerated() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_continue_on_decline(true));
        let ctx = context_with(Arc::new(CancelingSurface), &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        let err = outcome.abort_error().unwrap();
        assert!(err.is_canceled());
        assert_eq!(err.cancel_reason(), Some("wallet window closed"));
    }

    // -----------------------------------------------------------------------
    // Timeout behavior
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_no_response_times_out_with_the_duration_in_the_reason() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_timeout_ms(1000));
        let ctx = context_with(Arc::new(SilentSurface::default()), &plugin);

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        let err = outcome.abort_error().unwrap();
        assert!(err.is_canceled());
        assert!(err.cancel_reason().unwrap().contains("1 seconds"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_accept_before_the_deadline_disarms_the_guard() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_timeout_ms(5000));
        let ctx = context_with(
            Arc::new(SlowAcceptSurface {
                delay: Duration::from_millis(1000),
            }),
            &plugin,
        );

        let outcome = ctx
            .run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();
        assert!(outcome.is_continue());
    }

    // -----------------------------------------------------------------------
    // Prompt copy
    // -----------------------------------------------------------------------

    #[test]
    fn test_prompt_spec_discloses_a_configured_timeout() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_timeout_ms(5000));
        let spec = plugin.prompt_spec();
        assert!(spec.body.contains("automatically cancel in 5 seconds"));
    }

    #[test]
    fn test_prompt_spec_omits_the_disclosure_without_a_timeout() {
        let plugin = ConfirmPlugin::default();
        let spec = plugin.prompt_spec();
        assert!(!spec.body.contains("automatically cancel"));
        assert_eq!(
            spec.elements,
            vec![PromptElement::Accept, PromptElement::Decline]
        );
    }

    #[test]
    fn test_prompt_spec_honors_copy_overrides() {
        let plugin = ConfirmPlugin::new(
            ConfirmOptions::default().with_translation("title", "Sign this transfer?"),
        );
        assert_eq!(plugin.prompt_spec().title, "Sign this transfer?");
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_event_sequence_for_a_guarded_accept() {
        let plugin = ConfirmPlugin::new(ConfirmOptions::default().with_timeout_ms(5000));
        let mut receiver = plugin.events().subscribe();
        let ctx = context_with(
            Arc::new(SlowAcceptSurface {
                delay: Duration::from_millis(100),
            }),
            &plugin,
        );

        ctx.run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();

        let mut types = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec![
                "prompt_issued",
                "guard_armed",
                "guard_disarmed",
                "resolved",
                "outcome_produced",
            ]
        );
    }

    #[tokio::test]
    async fn test_no_guard_events_without_a_timeout() {
        let plugin = ConfirmPlugin::default();
        let mut receiver = plugin.events().subscribe();
        let ctx = context_with(Arc::new(DecliningSurface), &plugin);

        ctx.run_hooks(HookPhase::BeforeSign, make_request())
            .await
            .unwrap();

        let mut types = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(types, vec!["prompt_issued", "resolved", "outcome_produced"]);
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[test]
    fn test_register_adds_exactly_one_before_sign_hook() {
        let plugin = ConfirmPlugin::default();
        let mut ctx = TransactContext::new();
        ctx.install(&plugin);
        assert_eq!(ctx.hook_count(HookPhase::BeforeSign), 1);
        assert_eq!(ctx.hook_count(HookPhase::AfterSign), 0);
    }

    #[test]
    fn test_plugin_id() {
        assert_eq!(TransactPlugin::id(&ConfirmPlugin::default()), PLUGIN_ID);
    }
}
