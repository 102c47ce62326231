//! Static form structure.
//!
//! A [`FormStructure`] is built once per session from a [`FormDefinition`].
//! Building resolves every field's rule-group against the [`RuleBook`] and
//! precomputes its group chain (form title, section title), so nothing
//! downstream walks the live view to find out where a field lives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::rules::RuleBook;

// ---------------------------------------------------------------------------
// Definition (external JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SectionDefinition>,
    /// Fields not attached to any section.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub target: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub rule_group: Option<String>,
    #[serde(default)]
    pub control_id: Option<String>,
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// Everything the validators, grouping and navigation need to know about one
/// field. Lives for the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    target: String,
    label: String,
    required: bool,
    rule_group: Option<String>,
    control_id: Option<String>,
    group_chain: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(target: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
            required: false,
            rule_group: None,
            control_id: None,
            group_chain: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_rule_group(mut self, id: impl Into<String>) -> Self {
        self.rule_group = Some(id.into());
        self
    }

    pub fn with_control_id(mut self, id: impl Into<String>) -> Self {
        self.control_id = Some(id.into());
        self
    }

    pub fn with_group_chain<I, S>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_chain = chain.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the field's value in the record.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Human-readable name, copied into messages as secondary text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether an empty value raises the mandatory-field message.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Id of the rule group whose constraint applies, if any.
    pub fn rule_group(&self) -> Option<&str> {
        self.rule_group.as_deref()
    }

    /// Id under which the live control is registered for navigation.
    pub fn control_id(&self) -> Option<&str> {
        self.control_id.as_deref()
    }

    /// Ancestor titles, outermost first.
    pub fn group_chain(&self) -> &[String] {
        &self.group_chain
    }

    fn from_definition(def: FieldDefinition, chain: Vec<String>) -> Self {
        Self {
            target: def.target,
            label: def.label,
            required: def.required,
            rule_group: def.rule_group,
            control_id: def.control_id.filter(|id| !id.is_empty()),
            group_chain: chain,
        }
    }
}

// ---------------------------------------------------------------------------
// FormStructure
// ---------------------------------------------------------------------------

/// The fields of one form, in declaration order.
#[derive(Debug, Clone)]
pub struct FormStructure {
    title: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl FormStructure {
    /// Build the structure, checking every rule-group reference.
    ///
    /// An unconfigured rule-group is a [`CoreError::UnknownRuleGroup`]; it is
    /// never defaulted.
    pub fn build(def: FormDefinition, rules: &RuleBook) -> Result<Self, CoreError> {
        let title = def.title;
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        let sectioned = def.sections.into_iter().flat_map(|section| {
            let chain = title_chain([title.as_str(), section.title.as_str()]);
            section
                .fields
                .into_iter()
                .map(move |f| (f, chain.clone()))
        });
        let loose = def
            .fields
            .into_iter()
            .map(|f| (f, title_chain([title.as_str()])));

        for (def, chain) in sectioned.chain(loose) {
            if let Some(group) = def.rule_group.as_deref() {
                rules.require(&def.target, group)?;
            }
            if index.contains_key(&def.target) {
                return Err(CoreError::DuplicateField(def.target));
            }
            index.insert(def.target.clone(), fields.len());
            fields.push(FieldDescriptor::from_definition(def, chain));
        }

        tracing::debug!(form = %title, field_count = fields.len(), "Form structure built");
        Ok(Self {
            title,
            fields,
            index,
        })
    }

    pub fn from_json(json: &str, rules: &RuleBook) -> Result<Self, CoreError> {
        let def: FormDefinition = serde_json::from_str(json)
            .map_err(|e| CoreError::Configuration(format!("Invalid form definition: {e}")))?;
        Self::build(def, rules)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn field(&self, target: &str) -> Option<&FieldDescriptor> {
        self.index.get(target).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Untitled levels are left out, which leaves the chain incomplete.
fn title_chain<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    titles
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
