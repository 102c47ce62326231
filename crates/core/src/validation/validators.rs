//! Required-field and constraint validators.

use serde::Serialize;
use serde_json::Value;

use super::is_empty_value;
use crate::form::FieldDescriptor;
use crate::message::{ValidationMessage, ValueState};
use crate::rules::RuleBook;
use crate::severity::Severity;

/// Text of the message raised for an empty required field.
pub const REQUIRED_MESSAGE: &str = "Mandatory field required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    Required,
    Constraint,
}

pub trait FieldValidator {
    fn kind(&self) -> ValidatorKind;

    /// `None` means the value passes (or the validator does not apply).
    fn validate(&self, value: &Value, field: &FieldDescriptor) -> Option<ValidationMessage>;
}

/// Fails with [`REQUIRED_MESSAGE`] when a required field is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl FieldValidator for RequiredValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Required
    }

    fn validate(&self, value: &Value, field: &FieldDescriptor) -> Option<ValidationMessage> {
        if !field.is_required() || !is_empty_value(value) {
            return None;
        }
        Some(
            ValidationMessage::new(field.target(), Severity::Error, REQUIRED_MESSAGE)
                .with_additional_text(field.label())
                .with_value_state(ValueState::Error)
                .with_control_id(field.control_id().map(str::to_string)),
        )
    }
}

/// Runs the checker of the field's rule-group and, on violation, raises a
/// message with that group's fixed text.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintValidator<'a> {
    rules: &'a RuleBook,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }
}

impl FieldValidator for ConstraintValidator<'_> {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Constraint
    }

    fn validate(&self, value: &Value, field: &FieldDescriptor) -> Option<ValidationMessage> {
        let group_id = field.rule_group()?;
        // Forms are checked against the rule book when built; a miss here
        // means a different book was passed in.
        let (group, checker) = match (self.rules.get(group_id), self.rules.checker(group_id)) {
            (Some(group), Some(checker)) => (group, checker),
            _ => {
                tracing::error!(
                    field = field.target(),
                    group = group_id,
                    "Rule group missing from rule book; constraint not checked",
                );
                return None;
            }
        };

        let violation = checker.check(value).err()?;
        tracing::debug!(
            field = field.target(),
            group = group_id,
            reason = %violation,
            "Constraint violated",
        );
        Some(
            ValidationMessage::new(field.target(), group.severity, group.message.clone())
                .with_additional_text(field.label())
                .with_description(group.description.clone())
                .with_value_state(group.value_state)
                .with_control_id(field.control_id().map(str::to_string)),
        )
    }
}
