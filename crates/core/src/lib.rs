//! Form validation core.
//!
//! Pure logic for the validation message lifecycle: the message data model,
//! rule-group configuration, field validators, severity aggregation and
//! group labels. No I/O and no async runtime; the store and navigation live
//! in `formcheck-events` and `formcheck-app`.

pub mod error;
pub mod form;
pub mod grouping;
pub mod message;
pub mod rules;
pub mod severity;
pub mod types;
pub mod validation;
