//! Runs the applicable validators for one field in a fixed order.

use serde_json::Value;

use super::validators::{ConstraintValidator, FieldValidator, RequiredValidator, ValidatorKind};
use crate::form::FieldDescriptor;
use crate::message::ValidationMessage;
use crate::rules::RuleBook;

/// Required check first, constraint check second.
pub const EVALUATION_ORDER: [ValidatorKind; 2] = [ValidatorKind::Required, ValidatorKind::Constraint];

/// Evaluate every validator that applies to `field` and return the verdict.
///
/// The store keeps one message per target, so when several validators fail
/// the last one in [`EVALUATION_ORDER`] wins. A passing validator does not
/// erase an earlier failure.
pub fn evaluate_field(
    value: &Value,
    field: &FieldDescriptor,
    rules: &RuleBook,
) -> Option<ValidationMessage> {
    let constraint = ConstraintValidator::new(rules);
    let validators: [&dyn FieldValidator; 2] = [&RequiredValidator, &constraint];
    debug_assert!(validators
        .iter()
        .map(|v| v.kind())
        .eq(EVALUATION_ORDER.iter().copied()));

    validators
        .iter()
        .filter_map(|v| v.validate(value, field))
        .last()
}
