//! Validation messages shown on components in the authoring tool.
//!
//! A component collects warnings and errors as [`ValidationMessage`]s. The
//! authoring page shows one summary line (explicit, or derived from the
//! detailed messages) and, depending on where the component is rendered,
//! the detailed list.

#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary text used when none was set explicitly.
pub const DEFAULT_SUMMARY: &str = "This component has validation issues.";

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Warning,
    Error,
}

impl MessageType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Label prefixed to the message text ("Warning: ...").
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One warning or error, with an optional action the author can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    #[serde(rename = "message")]
    pub text: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_runtime_event: Option<String>,
}

impl ValidationMessage {
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, MessageType::Warning)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageType::Error)
    }

    pub fn new(text: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            text: text.into(),
            message_type,
            action_class: None,
            action_runtime_event: None,
        }
    }

    /// `"Warning: <text>"` / `"Error: <text>"`.
    pub fn labelled(&self) -> String {
        format!("{}: {}", self.message_type.display_name(), self.text)
    }
}

/// The summary line: text plus an optional explicit type.
///
/// An empty text (including an empty `{}` summary object) counts as no
/// summary at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMessage {
    #[serde(rename = "message", default)]
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
}

/// All validation output for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
    summary: Option<SummaryMessage>,
    detailed_messages: Vec<ValidationMessage>,
    /// Hide the detailed list unless the component is the page root.
    pub show_detailed_only_when_root: bool,
    pub additional_root_classes: String,
    pub additional_inline_classes: String,
}

impl ValidationMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: ValidationMessage) {
        self.detailed_messages.push(message);
    }

    pub fn add_message(
        &mut self,
        text: impl Into<String>,
        message_type: MessageType,
        action_class: Option<String>,
        action_runtime_event: Option<String>,
    ) {
        self.add(ValidationMessage {
            text: text.into(),
            message_type,
            action_class,
            action_runtime_event,
        });
    }

    pub fn set_summary(&mut self, summary: SummaryMessage) {
        self.summary = Some(summary);
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.detailed_messages
    }

    pub fn is_empty(&self) -> bool {
        self.detailed_messages.is_empty()
            && self.summary.as_ref().is_none_or(|s| s.text.is_empty())
    }

    /// `Error` if any detailed message is an error, otherwise `Warning`.
    pub fn summary_type(&self) -> MessageType {
        if self
            .detailed_messages
            .iter()
            .any(|m| m.message_type == MessageType::Error)
        {
            MessageType::Error
        } else {
            MessageType::Warning
        }
    }

    /// The summary to display, with its type always filled in.
    pub fn summary(&self) -> ValidationMessage {
        let (text, explicit_type) = match self.summary.as_ref().filter(|s| !s.text.is_empty()) {
            Some(summary) => (summary.text.clone(), summary.message_type),
            None => (DEFAULT_SUMMARY.to_string(), None),
        };
        ValidationMessage::new(text, explicit_type.unwrap_or_else(|| self.summary_type()))
    }

    /// Detailed messages to show for a component rendered as root or inline.
    pub fn detailed_messages(&self, is_root: bool) -> &[ValidationMessage] {
        if self.show_detailed_only_when_root && !is_root {
            return &[];
        }
        &self.detailed_messages
    }

    /// Extra CSS classes for the container.
    pub fn additional_classes(&self, is_root: bool) -> &str {
        if is_root {
            &self.additional_root_classes
        } else {
            &self.additional_inline_classes
        }
    }
}
