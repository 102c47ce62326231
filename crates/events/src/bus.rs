//! In-process change bus backed by a `tokio::sync::broadcast` channel.

use tokio::sync::broadcast;

/// "The store changed." Observers re-query the store for its contents.
///
/// `revision` increases by one per mutation; a receiver that sees a gap knows
/// it missed notifications, nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub revision: u64,
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out notification channel.
///
/// Subscribing registers an observer; dropping the returned receiver
/// unregisters it.
pub struct ChangeBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl ChangeBus {
    /// When the buffer is full, slow receivers observe `RecvError::Lagged`
    /// and should simply re-query.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Notify all current subscribers. Dropped silently when nobody listens.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
