//! Shared fixtures for the session integration tests.
//!
//! Builds the customer form from `config/form.json`, registers recording
//! controls for every field that has a control id and loads the record from
//! an in-memory provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formcheck_app::config::NavigationConfig;
use formcheck_app::loader::{DataProvider, LoadError};
use formcheck_app::navigation::{FieldControl, FieldRegistry, NavigationResolver, ScrollOffset, Viewport};
use formcheck_app::session::FormSession;
use formcheck_core::form::FormStructure;
use formcheck_core::rules::RuleBook;
use formcheck_events::MessageStore;
use serde_json::{json, Value};

pub const CUSTOMER_FORM: &str = include_str!("../../../../config/form.json");

pub const NAME: &str = "forms/0/name";
pub const EMAIL: &str = "forms/0/email";
pub const HOURS: &str = "forms/0/hours";
pub const NOTES: &str = "forms/0/notes";

// ---------------------------------------------------------------------------
// Host doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingControl {
    focused: AtomicUsize,
}

impl RecordingControl {
    pub fn focus_count(&self) -> usize {
        self.focused.load(Ordering::SeqCst)
    }
}

impl FieldControl for RecordingControl {
    fn focus(&self) {
        self.focused.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingViewport {
    scrolls: Mutex<Vec<(Duration, ScrollOffset)>>,
}

impl RecordingViewport {
    pub fn scrolls(&self) -> Vec<(Duration, ScrollOffset)> {
        self.scrolls.lock().unwrap().clone()
    }
}

impl Viewport for RecordingViewport {
    fn scroll_to(&self, _control: &dyn FieldControl, duration: Duration, offset: ScrollOffset) {
        self.scrolls.lock().unwrap().push((duration, offset));
    }
}

/// Serves one fixed record, or fails with a not-found error.
pub struct MemoryProvider {
    record: Option<Value>,
}

impl MemoryProvider {
    pub fn with(record: Value) -> Self {
        Self {
            record: Some(record),
        }
    }

    pub fn missing() -> Self {
        Self { record: None }
    }
}

#[async_trait]
impl DataProvider for MemoryProvider {
    async fn load(&self, path: &str) -> Result<Value, LoadError> {
        self.record.clone().ok_or_else(|| LoadError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such record"),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub fn customer_record() -> Value {
    json!({
        "forms": [{
            "name": "Jane Doe",
            "email": "jane.doe@example.com",
            "hours": 38,
            "notes": ""
        }]
    })
}

pub fn customer_form(rules: &RuleBook) -> FormStructure {
    FormStructure::from_json(CUSTOMER_FORM, rules).expect("customer form should build")
}

pub struct Harness {
    pub session: FormSession,
    pub store: Arc<MessageStore>,
    pub viewport: Arc<RecordingViewport>,
    /// Keyed by control id. Dropping an entry takes the control out of view.
    pub controls: HashMap<String, Arc<RecordingControl>>,
}

impl Harness {
    pub fn control(&self, id: &str) -> &Arc<RecordingControl> {
        &self.controls[id]
    }
}

pub async fn harness(record: Value) -> Harness {
    harness_with(RuleBook::builtin(), record).await
}

pub async fn harness_with(rules: RuleBook, record: Value) -> Harness {
    let form = Arc::new(customer_form(&rules));

    let registry = Arc::new(FieldRegistry::new());
    let mut controls = HashMap::new();
    for id in form.fields().filter_map(|f| f.control_id()) {
        let control = Arc::new(RecordingControl::default());
        registry.register(id, &control).await;
        controls.insert(id.to_string(), control);
    }

    let viewport = Arc::new(RecordingViewport::default());
    let navigation = Arc::new(
        NavigationResolver::new(
            registry,
            Arc::clone(&viewport) as Arc<dyn Viewport>,
            NavigationConfig::default(),
        )
        .unwrap(),
    );

    let store = Arc::new(MessageStore::new());
    let session = FormSession::start(
        form,
        Arc::new(rules),
        Arc::clone(&store),
        navigation,
        &MemoryProvider::with(record),
        "customer.json",
    )
    .await
    .expect("session should start");

    Harness {
        session,
        store,
        viewport,
        controls,
    }
}
