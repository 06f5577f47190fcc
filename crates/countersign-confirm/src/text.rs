//! Prompt copy and template rendering.
//!
//! The plugin ships built-in copy for every key it renders; hosts override
//! individual keys through
//! [`ConfirmOptions::translations`](crate::ConfirmOptions). Templates may
//! reference `{{timeout}}`, replaced with the configured duration in whole
//! seconds.

use std::collections::HashMap;
use std::time::Duration;

/// Copy key for the prompt title.
pub const TITLE: &str = "title";
/// Copy key for the prompt body.
pub const BODY: &str = "body";
/// Copy key for the timeout disclosure appended to the body.
pub const TIMEOUT: &str = "timeout";
/// Copy key for the cancellation reason recorded when the timeout fires.
pub const TIMEOUT_TRIGGER: &str = "timeout_trigger";

const DEFAULTS: [(&str, &str); 4] = [
    (TITLE, "Confirm transaction"),
    (BODY, "Review the transaction details before it is signed."),
    (
        TIMEOUT,
        "This prompt will automatically cancel in {{timeout}} seconds.",
    ),
    (
        TIMEOUT_TRIGGER,
        "Prompt timed out automatically after {{timeout}} seconds.",
    ),
];

/// Prompt copy with per-key overrides on top of the built-in defaults.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<&'static str, String>,
}

impl Catalog {
    /// Built-in copy with `overrides` merged on top.
    ///
    /// Override keys that do not name a known copy slot are ignored.
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut entries: HashMap<&'static str, String> = DEFAULTS
            .iter()
            .map(|(key, template)| (*key, (*template).to_string()))
            .collect();
        for (key, template) in overrides {
            if let Some(slot) = entries.get_mut(key.as_str()) {
                *slot = template.clone();
            } else {
                tracing::warn!(key = %key, "ignoring unknown prompt copy override");
            }
        }
        Self { entries }
    }

    /// The template registered for `key`, or empty for unknown keys.
    #[must_use]
    pub fn template(&self, key: &str) -> &str {
        self.entries.get(key).map_or("", String::as_str)
    }

    /// Render `key`, substituting the duration for `{{timeout}}`.
    #[must_use]
    pub fn render(&self, key: &str, timeout: Duration) -> String {
        render_template(self.template(key), timeout)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}

/// Substitute the duration in whole seconds for every `{{timeout}}`.
#[must_use]
pub fn render_template(template: &str, timeout: Duration) -> String {
    template.replace("{{timeout}}", &timeout.as_secs().to_string())
}
