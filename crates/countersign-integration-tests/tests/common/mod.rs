//! Shared fixtures for pipeline scenarios.

use countersign_core::{
    Confirmation, ConfirmationResolver, PromptSpec, SigningRequest, UserPrompt,
};
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// A plausible token transfer awaiting signature.
pub fn transfer_request() -> SigningRequest {
    SigningRequest::new(
        "mainnet",
        "transfer 1.0 TOKEN from alice to bob",
        json!({
            "actions": [{
                "account": "token",
                "name": "transfer",
                "data": {"from": "alice", "to": "bob", "quantity": "1.0 TOKEN"}
            }]
        }),
    )
}

/// How a [`ScriptedSurface`] responds to each prompt.
pub enum Script {
    /// Accept immediately.
    Accept,
    /// Decline immediately.
    Decline,
    /// Cancel immediately with the given reason.
    Cancel(&'static str),
    /// Accept after the given delay.
    AcceptAfter(Duration),
    /// Never respond; the prompt stays pending.
    Silent,
}

/// A prompt surface that answers every prompt with one scripted action
/// and counts how often it was consulted.
pub struct ScriptedSurface {
    script: Script,
    /// Number of prompts this surface received.
    pub prompts: AtomicUsize,
    parked: Mutex<Vec<ConfirmationResolver>>,
}

impl ScriptedSurface {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            prompts: AtomicUsize::new(0),
            parked: Mutex::new(Vec::new()),
        }
    }
}

impl UserPrompt for ScriptedSurface {
    fn prompt(&self, _spec: PromptSpec) -> Confirmation {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let (confirmation, resolver) = Confirmation::pair();
        match &self.script {
            Script::Accept => resolver.accept(),
            Script::Decline => resolver.reject(),
            Script::Cancel(reason) => resolver.cancel(*reason),
            Script::AcceptAfter(delay) => {
                let delay = *delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    resolver.accept();
                });
            },
            Script::Silent => self.parked.lock().unwrap().push(resolver),
        }
        confirmation
    }
}
