//! Rule-group configuration.
//!
//! A rule-group maps an identifier to the fixed text, severity, description
//! and value-state used when a field of that group violates its constraint.
//! The table is supplied externally (JSON) or taken from
//! [`RuleBook::builtin`]; it is never computed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::message::ValueState;
use crate::severity::Severity;
use crate::validation::constraint::{
    ConstraintChecker, EmailFormat, NumericRange, PatternMatch, TextLength, Unconstrained,
};

/// Identifier of the built-in email rule-group.
pub const EMAIL_FORMAT: &str = "email-format";

/// Identifier of the built-in weekly hours rule-group.
pub const HOURS_LIMIT: &str = "hours-limit";

/// Weekly hours above this value raise a warning.
pub const MAX_WEEKLY_HOURS: f64 = 40.0;

/// Declarative constraint attached to a rule-group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintSpec {
    #[default]
    None,
    Email,
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    Pattern {
        pattern: String,
    },
}

impl ConstraintSpec {
    fn compile(&self) -> Result<Arc<dyn ConstraintChecker>, String> {
        let checker: Arc<dyn ConstraintChecker> = match self {
            ConstraintSpec::None => Arc::new(Unconstrained),
            ConstraintSpec::Email => Arc::new(EmailFormat),
            ConstraintSpec::Range { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(format!("min {lo} is greater than max {hi}"));
                    }
                }
                Arc::new(NumericRange {
                    min: *min,
                    max: *max,
                })
            }
            ConstraintSpec::Length { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(format!("min {lo} is greater than max {hi}"));
                    }
                }
                Arc::new(TextLength {
                    min: *min,
                    max: *max,
                })
            }
            ConstraintSpec::Pattern { pattern } => {
                Arc::new(PatternMatch::new(pattern).map_err(|e| e.to_string())?)
            }
        };
        Ok(checker)
    }
}

/// One row of the rule-group table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value_state: ValueState,
    #[serde(default)]
    pub constraint: ConstraintSpec,
}

struct CompiledRule {
    group: RuleGroup,
    checker: Arc<dyn ConstraintChecker>,
}

/// The rule-group table with each group's constraint checker compiled.
pub struct RuleBook {
    rules: HashMap<String, CompiledRule>,
}

impl fmt::Debug for RuleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.rules.keys().collect();
        ids.sort();
        f.debug_struct("RuleBook").field("groups", &ids).finish()
    }
}

impl RuleBook {
    /// Compile a rule-group table.
    ///
    /// Fails on duplicate ids and on constraints that cannot be compiled.
    pub fn new(groups: Vec<RuleGroup>) -> Result<Self, CoreError> {
        let mut rules = HashMap::with_capacity(groups.len());
        for group in groups {
            let checker = group.constraint.compile().map_err(|reason| {
                tracing::error!(group = %group.id, %reason, "Invalid rule group");
                CoreError::InvalidRuleGroup {
                    group: group.id.clone(),
                    reason,
                }
            })?;
            if rules.contains_key(&group.id) {
                tracing::error!(group = %group.id, "Duplicate rule group id");
                return Err(CoreError::InvalidRuleGroup {
                    group: group.id,
                    reason: "duplicate id".into(),
                });
            }
            rules.insert(group.id.clone(), CompiledRule { group, checker });
        }
        Ok(Self { rules })
    }

    /// Parse and compile a JSON array of rule-groups.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let groups: Vec<RuleGroup> = serde_json::from_str(json)
            .map_err(|e| CoreError::Configuration(format!("Invalid rule group table: {e}")))?;
        Self::new(groups)
    }

    /// The two groups used by the customer form: email format and weekly
    /// hours limit.
    pub fn builtin() -> Self {
        let groups = [
            (
                RuleGroup {
                    id: EMAIL_FORMAT.into(),
                    message: "Invalid email".into(),
                    severity: Severity::Error,
                    description: "The value of the email field should be a valid email address"
                        .into(),
                    value_state: ValueState::Error,
                    constraint: ConstraintSpec::Email,
                },
                Arc::new(EmailFormat) as Arc<dyn ConstraintChecker>,
            ),
            (
                RuleGroup {
                    id: HOURS_LIMIT.into(),
                    message: "The value should not exceed 40".into(),
                    severity: Severity::Warning,
                    description: "The value of the working hours should not exceed 40 hours"
                        .into(),
                    value_state: ValueState::Warning,
                    constraint: ConstraintSpec::Range {
                        min: None,
                        max: Some(MAX_WEEKLY_HOURS),
                    },
                },
                Arc::new(NumericRange {
                    min: None,
                    max: Some(MAX_WEEKLY_HOURS),
                }) as Arc<dyn ConstraintChecker>,
            ),
        ];
        let rules = groups
            .into_iter()
            .map(|(group, checker)| (group.id.clone(), CompiledRule { group, checker }))
            .collect();
        Self { rules }
    }

    /// Replace the checker of an existing group with an injected one.
    pub fn with_checker(
        mut self,
        id: &str,
        checker: Arc<dyn ConstraintChecker>,
    ) -> Result<Self, CoreError> {
        let rule = self.rules.get_mut(id).ok_or_else(|| {
            CoreError::Configuration(format!("Cannot attach checker to unknown rule group '{id}'"))
        })?;
        rule.checker = checker;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&RuleGroup> {
        self.rules.get(id).map(|r| &r.group)
    }

    pub fn checker(&self, id: &str) -> Option<&dyn ConstraintChecker> {
        self.rules.get(id).map(|r| r.checker.as_ref())
    }

    /// Look up the group a field refers to, failing loudly if it is missing.
    pub fn require(&self, field: &str, id: &str) -> Result<&RuleGroup, CoreError> {
        self.get(id).ok_or_else(|| {
            tracing::error!(field, group = id, "Field references unknown rule group");
            CoreError::UnknownRuleGroup {
                field: field.to_string(),
                group: id.to_string(),
            }
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
