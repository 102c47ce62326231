//! Validation message types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::severity::Severity;
use crate::types::Timestamp;

/// Decoration applied to an input while it carries a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueState {
    #[default]
    None,
    Error,
    Warning,
    Success,
    Information,
}

/// A single active validation message bound to one field target.
///
/// Constructed via [`ValidationMessage::new`] and enriched with the builder
/// methods. The `sequence` is assigned by the message store on insertion and
/// is `0` for messages that have not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub id: Uuid,

    /// Path of the field inside the record, e.g. `"forms/0/name"`.
    pub target: String,

    pub severity: Severity,

    /// Primary text, e.g. `"Mandatory field required"`.
    pub message: String,

    /// Secondary text; the label of the offending field.
    pub additional_text: String,

    /// Long description shown when the message is expanded.
    pub description: String,

    pub value_state: ValueState,

    /// Id of the live control this message was raised for, if any.
    pub control_id: Option<String>,

    /// Store insertion order.
    pub sequence: u64,

    pub created_at: Timestamp,
}

impl ValidationMessage {
    pub fn new(target: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            target: target.into(),
            severity,
            message: message.into(),
            additional_text: String::new(),
            description: String::new(),
            value_state: ValueState::None,
            control_id: None,
            sequence: 0,
            created_at: Utc::now(),
        }
    }

    /// Set the secondary text (usually the field label).
    pub fn with_additional_text(mut self, text: impl Into<String>) -> Self {
        self.additional_text = text.into();
        self
    }

    /// Set the long description shown when the message is expanded.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the decoration applied to the field while this message is active.
    pub fn with_value_state(mut self, state: ValueState) -> Self {
        self.value_state = state;
        self
    }

    /// Associate the message with a live control. `None` leaves it
    /// unnavigable.
    pub fn with_control_id(mut self, control_id: Option<String>) -> Self {
        self.control_id = control_id;
        self
    }

    /// Whether the message is associated with a control at all.
    ///
    /// Whether that control still exists in the live view is decided by the
    /// navigation resolver.
    pub fn has_control(&self) -> bool {
        self.control_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
