//! Form-view session controller.
//!
//! A [`FormSession`] is created when the form view opens and ended when it
//! closes. It owns the current record, drives validation on every field
//! change and exposes the derived views (message list, summary, value
//! states) the display side renders.

use std::collections::HashMap;
use std::sync::Arc;

use formcheck_core::error::CoreError;
use formcheck_core::form::{FieldDescriptor, FormStructure};
use formcheck_core::grouping::GroupResolver;
use formcheck_core::message::{ValidationMessage, ValueState};
use formcheck_core::rules::RuleBook;
use formcheck_core::severity::{Severity, Summary};
use formcheck_core::types::record_pointer;
use formcheck_core::validation::evaluate_field;
use formcheck_events::MessageStore;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::loader::DataProvider;
use crate::navigation::{Activation, NavigationResolver};

/// Validation state of one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FieldState {
    #[default]
    Untouched,
    Validating,
    Valid,
    /// Carries the severity of the field's single active message.
    Invalid(Severity),
}

/// One row of the message list.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListItem {
    pub target: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub severity: Severity,
    pub value_state: ValueState,
    /// Whether the title is clickable.
    pub navigable: bool,
    /// "Form Title - Section Title", when the field sits in a section.
    pub group: Option<String>,
}

pub struct FormSession {
    form: Arc<FormStructure>,
    rules: Arc<RuleBook>,
    store: Arc<MessageStore>,
    navigation: Arc<NavigationResolver>,
    groups: GroupResolver,
    record: RwLock<Value>,
    states: RwLock<HashMap<String, FieldState>>,
}

impl FormSession {
    /// Open a session: clear the store and load the initial record.
    ///
    /// Every rule group the form references must be present in `rules`;
    /// a form built against a different rule book fails here with
    /// [`CoreError::UnknownRuleGroup`]. Errors from the data provider are
    /// returned as-is.
    pub async fn start(
        form: Arc<FormStructure>,
        rules: Arc<RuleBook>,
        store: Arc<MessageStore>,
        navigation: Arc<NavigationResolver>,
        provider: &dyn DataProvider,
        record_path: &str,
    ) -> AppResult<Self> {
        for field in form.fields() {
            if let Some(group) = field.rule_group() {
                rules.require(field.target(), group)?;
            }
        }

        store.remove_all().await;
        let record = provider.load(record_path).await?;

        let states: HashMap<String, FieldState> = form
            .fields()
            .map(|f| (f.target().to_string(), FieldState::Untouched))
            .collect();

        tracing::info!(
            form = %form.title(),
            fields = form.len(),
            record = record_path,
            "Form session started",
        );

        Ok(Self {
            form,
            rules,
            store,
            navigation,
            groups: GroupResolver,
            record: RwLock::new(record),
            states: RwLock::new(states),
        })
    }

    pub fn form(&self) -> &FormStructure {
        &self.form
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Handle a field-change event.
    ///
    /// The field's previous message is cleared before its validators run, so
    /// a target never accumulates stale messages.
    pub async fn on_field_change(&self, target: &str, value: Value) -> Result<FieldState, CoreError> {
        let field = self
            .form
            .field(target)
            .ok_or_else(|| CoreError::UnknownField(target.to_string()))?;

        self.set_state(target, FieldState::Validating).await;
        self.write_value(target, value.clone()).await;
        self.store.remove_by_target(target).await;

        Ok(self.apply(field, &value).await)
    }

    /// Clear the store and validate every field against the current record.
    ///
    /// Returns the number of active messages afterwards.
    pub async fn revalidate_all(&self) -> usize {
        self.store.remove_all().await;
        for field in self.form.fields() {
            self.set_state(field.target(), FieldState::Validating).await;
            let value = self.value_of(field.target()).await;
            self.apply(field, &value).await;
        }
        let count = self.store.len().await;
        tracing::debug!(count, "Bulk revalidation finished");
        count
    }

    async fn apply(&self, field: &FieldDescriptor, value: &Value) -> FieldState {
        let state = match evaluate_field(value, field, &self.rules) {
            Some(msg) => {
                let state = FieldState::Invalid(msg.severity);
                self.store.add_message(msg).await;
                state
            }
            None => FieldState::Valid,
        };
        self.set_state(field.target(), state).await;
        state
    }

    /// Current value of a field in the record; `Null` when absent.
    pub async fn value_of(&self, target: &str) -> Value {
        self.record
            .read()
            .await
            .pointer(&record_pointer(target))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub async fn record(&self) -> Value {
        self.record.read().await.clone()
    }

    pub async fn field_state(&self, target: &str) -> Option<FieldState> {
        self.states.read().await.get(target).copied()
    }

    /// Decoration for a field: its active message's value-state, or `None`
    /// once the field is valid again.
    pub async fn value_state(&self, target: &str) -> ValueState {
        self.store
            .get(target)
            .await
            .map(|m| m.value_state)
            .unwrap_or_default()
    }

    pub async fn messages(&self) -> Vec<ValidationMessage> {
        self.store.query().await
    }

    /// Messages in insertion order, ready for display.
    pub async fn message_list(&self) -> Vec<MessageListItem> {
        let messages = self.store.query().await;
        let mut items = Vec::with_capacity(messages.len());
        for msg in messages {
            let navigable = self.navigation.is_message_navigable(&msg).await;
            let group = self
                .form
                .field(&msg.target)
                .and_then(|f| self.groups.resolve(f));
            items.push(MessageListItem {
                target: msg.target,
                title: msg.message,
                subtitle: msg.additional_text,
                description: msg.description,
                severity: msg.severity,
                value_state: msg.value_state,
                navigable,
                group,
            });
        }
        items
    }

    pub async fn summary(&self) -> Summary {
        self.store.summary().await
    }

    /// Navigate to the field of the active message for `target`.
    ///
    /// A target without a message, or whose field has left the view, is a
    /// no-op.
    pub async fn activate(&self, target: &str) -> Activation {
        match self.store.get(target).await {
            Some(msg) => self.navigation.activate(&msg).await,
            None => {
                tracing::debug!(field = %target, "No active message to navigate to");
                Activation::Stale
            }
        }
    }

    /// Tear the session down: clear the store and drop any pending focus.
    pub async fn end(&self) {
        self.navigation.cancel_pending().await;
        let removed = self.store.remove_all().await;
        tracing::info!(removed, "Form session ended");
    }

    async fn set_state(&self, target: &str, state: FieldState) {
        self.states.write().await.insert(target.to_string(), state);
    }

    async fn write_value(&self, target: &str, value: Value) {
        let mut record = self.record.write().await;
        if !set_pointer(&mut record, &record_pointer(target), value) {
            tracing::warn!(field = %target, "Field has no slot in the record; value not stored");
        }
    }
}

/// Store `value` at `pointer`, creating a missing final object key or
/// appending at the end of an array. Returns `false` if the parent does not
/// exist.
///
/// A created key is unescaped (`~1` to `/`, then `~0` to `~`) so it reads
/// back through [`Value::pointer`].
fn set_pointer(record: &mut Value, pointer: &str, value: Value) -> bool {
    if let Some(slot) = record.pointer_mut(pointer) {
        *slot = value;
        return true;
    }
    let Some((parent, key)) = pointer.rsplit_once('/') else {
        return false;
    };
    match record.pointer_mut(parent) {
        Some(Value::Object(map)) => {
            map.insert(key.replace("~1", "/").replace("~0", "~"), value);
            true
        }
        Some(Value::Array(items)) if key.parse::<usize>().ok() == Some(items.len()) => {
            items.push(value);
            true
        }
        _ => false,
    }
}
