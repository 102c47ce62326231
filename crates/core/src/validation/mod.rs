//! Field validators.
//!
//! Validators are pure: they turn a field's current value into at most one
//! [`ValidationMessage`](crate::message::ValidationMessage) and never touch
//! the message store.

pub mod constraint;
pub mod evaluator;
pub mod validators;

use serde_json::Value;

pub use constraint::{ConstraintChecker, ConstraintViolation};
pub use evaluator::{evaluate_field, EVALUATION_ORDER};
pub use validators::{
    ConstraintValidator, FieldValidator, RequiredValidator, ValidatorKind, REQUIRED_MESSAGE,
};

/// Absent, `null` and the empty string count as "no value".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
