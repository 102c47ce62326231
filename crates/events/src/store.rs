//! The message store.
//!
//! One instance per form-view session, shared via `Arc<MessageStore>` with
//! every component that needs it. The map is guarded by an async `RwLock`;
//! each public operation takes the lock once, so a replace is atomic with
//! respect to readers and produces exactly one notification.

use formcheck_core::message::ValidationMessage;
use formcheck_core::severity::Summary;
use indexmap::IndexMap;
use tokio::sync::{broadcast, RwLock};

use crate::bus::{ChangeBus, StoreEvent};

#[derive(Default)]
struct StoreState {
    messages: IndexMap<String, ValidationMessage>,
    next_sequence: u64,
    revision: u64,
}

impl StoreState {
    fn bump(&mut self) -> StoreEvent {
        self.revision += 1;
        StoreEvent {
            revision: self.revision,
        }
    }
}

/// Active validation messages keyed by field target, in insertion order.
#[derive(Default)]
pub struct MessageStore {
    state: RwLock<StoreState>,
    bus: ChangeBus,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `msg`, replacing any message already held for its target.
    ///
    /// The replacement is appended at the end of the insertion order and
    /// subscribers are notified once.
    pub async fn add_message(&self, mut msg: ValidationMessage) {
        let event = {
            let mut state = self.state.write().await;
            let replaced = state.messages.shift_remove(&msg.target).is_some();
            msg.sequence = state.next_sequence;
            state.next_sequence += 1;
            tracing::debug!(
                field = %msg.target,
                severity = ?msg.severity,
                replaced,
                "Message added",
            );
            state.messages.insert(msg.target.clone(), msg);
            state.bump()
        };
        self.bus.publish(event);
    }

    /// Remove the message for `target`. Returns whether one existed; a miss
    /// leaves the store untouched and notifies nobody.
    pub async fn remove_by_target(&self, target: &str) -> bool {
        let event = {
            let mut state = self.state.write().await;
            if state.messages.shift_remove(target).is_none() {
                return false;
            }
            tracing::debug!(field = %target, "Message removed");
            state.bump()
        };
        self.bus.publish(event);
        true
    }

    /// Clear the store. Returns the number of messages removed.
    pub async fn remove_all(&self) -> usize {
        let (count, event) = {
            let mut state = self.state.write().await;
            let count = state.messages.len();
            if count == 0 {
                return 0;
            }
            state.messages.clear();
            (count, state.bump())
        };
        tracing::debug!(count, "All messages removed");
        self.bus.publish(event);
        count
    }

    /// Snapshot of the active messages in insertion order.
    pub async fn query(&self) -> Vec<ValidationMessage> {
        self.state.read().await.messages.values().cloned().collect()
    }

    /// The active message for `target`, if any.
    pub async fn get(&self, target: &str) -> Option<ValidationMessage> {
        self.state.read().await.messages.get(target).cloned()
    }

    /// Number of active messages (one per target).
    pub async fn len(&self) -> usize {
        self.state.read().await.messages.len()
    }

    /// Whether no message is active.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.messages.is_empty()
    }

    /// Number of mutations applied so far.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    pub async fn summary(&self) -> Summary {
        let state = self.state.read().await;
        let messages: Vec<_> = state.messages.values().cloned().collect();
        Summary::from_messages(&messages)
    }

    /// Register for change notifications. Drop the receiver to unregister.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_core::severity::Severity;
    use tokio::sync::broadcast::error::TryRecvError;

    fn msg(target: &str, severity: Severity) -> ValidationMessage {
        ValidationMessage::new(target, severity, format!("{severity:?} on {target}"))
    }

    #[tokio::test]
    async fn add_keeps_one_message_per_target() {
        let store = MessageStore::new();
        store.add_message(msg("forms/0/name", Severity::Error)).await;
        store.add_message(msg("forms/0/name", Severity::Warning)).await;
        store.add_message(msg("forms/0/name", Severity::Success)).await;

        let messages = store.query().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].target, "forms/0/name");
        assert_eq!(messages[0].severity, Severity::Success);
    }

    #[tokio::test]
    async fn replacement_moves_to_end_of_insertion_order() {
        let store = MessageStore::new();
        store.add_message(msg("a", Severity::Error)).await;
        store.add_message(msg("b", Severity::Error)).await;
        store.add_message(msg("a", Severity::Warning)).await;

        let targets: Vec<_> = store.query().await.into_iter().map(|m| m.target).collect();
        assert_eq!(targets, ["b", "a"]);
    }

    #[tokio::test]
    async fn sequence_reflects_insertion_time() {
        let store = MessageStore::new();
        store.add_message(msg("a", Severity::Error)).await;
        store.add_message(msg("b", Severity::Error)).await;

        let messages = store.query().await;
        assert!(messages[0].sequence < messages[1].sequence);
    }

    #[tokio::test]
    async fn add_notifies_exactly_once() {
        let store = MessageStore::new();
        store.add_message(msg("a", Severity::Error)).await;
        let mut rx = store.subscribe();

        store.add_message(msg("a", Severity::Warning)).await;

        assert_eq!(rx.try_recv().unwrap().revision, 2);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn remove_missing_target_is_a_silent_no_op() {
        let store = MessageStore::new();
        store.add_message(msg("a", Severity::Error)).await;
        let before = store.query().await;
        let mut rx = store.subscribe();

        assert!(!store.remove_by_target("zzz").await);

        let after = store.query().await;
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0].id, after[0].id);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(store.revision().await, 1);
    }

    #[tokio::test]
    async fn add_then_remove_leaves_no_entry() {
        let store = MessageStore::new();
        store.add_message(msg("forms/0/email", Severity::Error)).await;
        assert!(store.remove_by_target("forms/0/email").await);
        assert!(store.get("forms/0/email").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn remove_all_clears_and_notifies_once() {
        let store = MessageStore::new();
        store.add_message(msg("a", Severity::Error)).await;
        store.add_message(msg("b", Severity::Information)).await;
        let mut rx = store.subscribe();

        assert_eq!(store.remove_all().await, 2);
        assert_eq!(store.len().await, 0);
        assert!(rx.try_recv().is_ok());
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(store.remove_all().await, 0);
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test]
    async fn summary_tracks_store_contents() {
        let store = MessageStore::new();
        assert!(store.summary().await.is_empty());
        store.add_message(msg("a", Severity::Warning)).await;
        store.add_message(msg("b", Severity::Error)).await;
        let summary = store.summary().await;
        assert_eq!(summary.dominant, Some(Severity::Error));
        assert_eq!(summary.count, 1);
    }
}
