//! Severity ordering and the summary indicator derived from it.
//!
//! [`Severity`] is totally ordered (`Error > Warning > Success >
//! Information`), so the dominant severity of a message set is simply its
//! maximum. Display attributes come from a single lookup in
//! [`Severity::display`].

use serde::{Deserialize, Serialize};

use crate::message::ValidationMessage;

/// Classification of a validation outcome, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Information,
    Success,
    Warning,
    Error,
}

/// Emphasis of the summary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emphasis {
    Negative,
    Critical,
    Success,
    Neutral,
}

/// Display attributes for one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityDisplay {
    pub icon: &'static str,
    pub emphasis: Emphasis,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Error,
        Severity::Warning,
        Severity::Success,
        Severity::Information,
    ];

    pub const fn display(self) -> SeverityDisplay {
        match self {
            Severity::Error => SeverityDisplay {
                icon: "message-error",
                emphasis: Emphasis::Negative,
            },
            Severity::Warning => SeverityDisplay {
                icon: "message-warning",
                emphasis: Emphasis::Critical,
            },
            Severity::Success => SeverityDisplay {
                icon: "message-success",
                emphasis: Emphasis::Success,
            },
            Severity::Information => SeverityDisplay {
                icon: "message-information",
                emphasis: Emphasis::Neutral,
            },
        }
    }
}

/// Highest severity among `messages`, or `None` for an empty set.
pub fn dominant_severity(messages: &[ValidationMessage]) -> Option<Severity> {
    messages.iter().map(|m| m.severity).max()
}

pub fn icon_for(severity: Option<Severity>) -> Option<&'static str> {
    severity.map(|s| s.display().icon)
}

pub fn variant_for(severity: Option<Severity>) -> Option<Emphasis> {
    severity.map(|s| s.display().emphasis)
}

/// Number of messages exactly at the dominant severity.
pub fn count_at_dominant_severity(messages: &[ValidationMessage]) -> usize {
    match dominant_severity(messages) {
        Some(dominant) => messages.iter().filter(|m| m.severity == dominant).count(),
        None => 0,
    }
}

/// Badge text for a count.
///
/// A zero count renders as an empty badge rather than `"0"`; the summary
/// button shows no number at all when nothing is active.
pub fn badge_text(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        count.to_string()
    }
}

/// Everything the summary indicator needs, recomputed on every store change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub dominant: Option<Severity>,
    pub icon: Option<&'static str>,
    pub variant: Option<Emphasis>,
    pub count: usize,
    pub badge: String,
}

impl Summary {
    pub fn from_messages(messages: &[ValidationMessage]) -> Self {
        let dominant = dominant_severity(messages);
        let count = count_at_dominant_severity(messages);
        Self {
            dominant,
            icon: icon_for(dominant),
            variant: variant_for(dominant),
            count,
            badge: badge_text(count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dominant.is_none()
    }
}
