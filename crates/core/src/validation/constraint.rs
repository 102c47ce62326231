//! Value constraint checkers (format and range).
//!
//! A [`ConstraintChecker`] only answers "does this value satisfy the
//! constraint?". Turning a violation into a message is the job of
//! [`ConstraintValidator`](super::ConstraintValidator), which pairs the
//! checker with its rule-group's fixed text.

use std::fmt;

use regex::Regex;
use serde_json::Value;
use validator::ValidateEmail;

use super::is_empty_value;

/// Why a value failed its constraint. Logged, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConstraintViolation(pub String);

/// Checks a field value against one format/range constraint.
///
/// Empty values always pass; presence is enforced by the required check.
pub trait ConstraintChecker: Send + Sync {
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation>;
}

impl<F> ConstraintChecker for F
where
    F: Fn(&Value) -> Result<(), ConstraintViolation> + Send + Sync,
{
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        self(value)
    }
}

/// Always passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl ConstraintChecker for Unconstrained {
    fn check(&self, _value: &Value) -> Result<(), ConstraintViolation> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailFormat;

impl ConstraintChecker for EmailFormat {
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        if is_empty_value(value) {
            return Ok(());
        }
        let text = value
            .as_str()
            .ok_or_else(|| ConstraintViolation("expected text".into()))?;
        if text.to_string().validate_email() {
            Ok(())
        } else {
            Err(ConstraintViolation(format!("'{text}' is not an email address")))
        }
    }
}

/// Inclusive numeric bounds. Numeric strings are accepted, since form inputs
/// deliver text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ConstraintChecker for NumericRange {
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        if is_empty_value(value) {
            return Ok(());
        }
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ConstraintViolation(format!("{value} is not a number")))?;

        if let Some(min) = self.min.filter(|min| number < *min) {
            return Err(ConstraintViolation(format!("{number} is below {min}")));
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            return Err(ConstraintViolation(format!("{number} exceeds {max}")));
        }
        Ok(())
    }
}

/// Inclusive bounds on the number of characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextLength {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ConstraintChecker for TextLength {
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        if is_empty_value(value) {
            return Ok(());
        }
        let text = value
            .as_str()
            .ok_or_else(|| ConstraintViolation("expected text".into()))?;
        let len = text.chars().count();
        if self.min.is_some_and(|min| len < min) || self.max.is_some_and(|max| len > max) {
            return Err(ConstraintViolation(format!(
                "length {len} outside {:?}..={:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PatternMatch {
    regex: Regex,
}

impl PatternMatch {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl fmt::Debug for PatternMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternMatch").field(&self.regex.as_str()).finish()
    }
}

impl ConstraintChecker for PatternMatch {
    fn check(&self, value: &Value) -> Result<(), ConstraintViolation> {
        if is_empty_value(value) {
            return Ok(());
        }
        let text = value
            .as_str()
            .ok_or_else(|| ConstraintViolation("expected text".into()))?;
        if self.regex.is_match(text) {
            Ok(())
        } else {
            Err(ConstraintViolation(format!(
                "'{text}' does not match {}",
                self.regex.as_str()
            )))
        }
    }
}
