/// Errors raised while setting up or driving a form session.
///
/// A failed validation is *not* an error: it is reported as a
/// [`ValidationMessage`](crate::message::ValidationMessage).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Field '{field}' references unknown rule group '{group}'")]
    UnknownRuleGroup { field: String, group: String },

    #[error("Rule group '{group}' is invalid: {reason}")]
    InvalidRuleGroup { group: String, reason: String },

    #[error("Duplicate field target: {0}")]
    DuplicateField(String),

    #[error("Unknown field target: {0}")]
    UnknownField(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
