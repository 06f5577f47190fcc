//! Prompt capability implemented by user-facing surfaces.
//!
//! Plugins never render anything themselves. They build a [`PromptSpec`]
//! and hand it to whatever [`UserPrompt`] surface the pipeline was
//! assembled with (CLI, wallet window, web view). The surface returns a
//! pending [`Confirmation`](crate::Confirmation) immediately and records
//! the user's choice later through the resolver half it keeps.

use serde::{Deserialize, Serialize};

use crate::confirmation::Confirmation;

/// A single interactive element of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PromptElement {
    /// Control that resolves the confirmation as accepted.
    Accept,
    /// Control that resolves the confirmation as rejected.
    Decline,
    /// Non-interactive informational text.
    Note {
        /// The text to display.
        text: String,
    },
}

/// What a prompt surface should render for one confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Short title shown above the prompt.
    pub title: String,
    /// Body copy describing what the user is confirming.
    pub body: String,
    /// Interactive elements to render, in order.
    #[serde(default)]
    pub elements: Vec<PromptElement>,
}

impl PromptSpec {
    /// Create a spec with a title and body and no elements.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element.
    #[must_use]
    pub fn with_element(mut self, element: PromptElement) -> Self {
        self.elements.push(element);
        self
    }

    /// A spec with no visible copy and no elements cannot be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty() && self.elements.is_empty()
    }
}

/// Capability implemented by surfaces that can present confirmation
/// prompts to a user.
///
/// `prompt` must return without blocking: the surface renders from its own
/// event handling and resolves the returned confirmation when the user
/// acts. Cancellation arrives through the handle and is cooperative; the
/// surface should dismiss the prompt when it observes it.
pub trait UserPrompt: Send + Sync {
    /// Present `spec` to the user and return the pending confirmation.
    fn prompt(&self, spec: PromptSpec) -> Confirmation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_is_empty() {
        assert!(PromptSpec::new("", "").is_empty());
        assert!(PromptSpec::new("  ", "\t").is_empty());
        assert!(!PromptSpec::new("Confirm", "").is_empty());
        assert!(!PromptSpec::new("", "body").is_empty());
        assert!(
            !PromptSpec::new("", "")
                .with_element(PromptElement::Accept)
                .is_empty()
        );
    }

    #[test]
    fn test_spec_builder_keeps_element_order() {
        let spec = PromptSpec::new("Confirm", "Sign this?")
            .with_element(PromptElement::Accept)
            .with_element(PromptElement::Decline);
        assert_eq!(
            spec.elements,
            vec![PromptElement::Accept, PromptElement::Decline]
        );
    }

    #[test]
    fn test_element_serialization() {
        let json = serde_json::to_string(&PromptElement::Accept).unwrap();
        assert_eq!(json, r#"{"type":"accept"}"#);

        let note: PromptElement =
            serde_json::from_str(r#"{"type":"note","text":"fee applies"}"#).unwrap();
        assert_eq!(
            note,
            PromptElement::Note {
                text: "fee applies".to_string()
            }
        );
    }
}
