//! Plugin configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Options controlling the confirmation plugin.
///
/// Immutable for the plugin's lifetime. Deserializable from host
/// configuration; every field has a default, so an absent table yields a
/// prompting plugin with no timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConfirmOptions {
    /// Whether the plugin prompts at all. When false every request passes
    /// through untouched and the surface is never consulted.
    pub prompt: bool,
    /// Proceed with signing when the user declines the prompt.
    pub continue_on_decline: bool,
    /// Cancel the prompt automatically after this many milliseconds.
    /// Zero disables the timeout.
    pub timeout_ms: u64,
    /// Copy overrides merged over the built-in prompt text.
    pub translations: HashMap<String, String>,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            prompt: true,
            continue_on_decline: true,
            timeout_ms: 0,
            translations: HashMap::new(),
        }
    }
}

impl ConfirmOptions {
    /// Options for a plugin that never prompts.
    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            prompt: false,
            ..Self::default()
        }
    }

    /// Set the automatic-cancel timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set whether a decline lets the pipeline proceed.
    #[must_use]
    pub fn with_continue_on_decline(mut self, continue_on_decline: bool) -> Self {
        self.continue_on_decline = continue_on_decline;
        self
    }

    /// Override one copy key.
    #[must_use]
    pub fn with_translation(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.translations.insert(key.into(), template.into());
        self
    }

    /// The configured timeout, if one is enabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}
