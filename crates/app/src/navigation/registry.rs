//! Control id → live control lookup.
//!
//! The registry never owns a control. Entries are weak, so a control dropped
//! by the host stops resolving without anyone unregistering it.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;

use super::FieldControl;

#[derive(Default)]
pub struct FieldRegistry {
    controls: RwLock<HashMap<String, Weak<dyn FieldControl>>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `control` resolvable under `id`. Only a weak handle is kept;
    /// registering an id again replaces the previous entry.
    pub async fn register<C>(&self, id: impl Into<String>, control: &Arc<C>)
    where
        C: FieldControl + 'static,
    {
        let weak = Arc::downgrade(control);
        let weak: Weak<dyn FieldControl> = weak;
        self.controls.write().await.insert(id.into(), weak);
    }

    /// Forget `id`. Returns whether an entry existed.
    pub async fn unregister(&self, id: &str) -> bool {
        self.controls.write().await.remove(id).is_some()
    }

    /// The live control for `id`, if it still exists.
    pub async fn resolve(&self, id: &str) -> Option<Arc<dyn FieldControl>> {
        self.controls.read().await.get(id).and_then(Weak::upgrade)
    }

    /// Drop entries whose control is gone. Returns how many were removed.
    pub async fn prune(&self) -> usize {
        let mut controls = self.controls.write().await;
        let before = controls.len();
        controls.retain(|_, weak| weak.strong_count() > 0);
        before - controls.len()
    }

    /// Number of entries, including ones whose control is already gone.
    pub async fn len(&self) -> usize {
        self.controls.read().await.len()
    }

    /// Whether no control is registered.
    pub async fn is_empty(&self) -> bool {
        self.controls.read().await.is_empty()
    }
}
