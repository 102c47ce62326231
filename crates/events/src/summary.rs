//! Summary indicator publisher.
//!
//! [`SummaryPublisher`] runs as a background task, recomputing the
//! [`Summary`] after every store change and publishing it on a
//! `tokio::sync::watch` channel for the summary/badge control.

use std::sync::Arc;

use formcheck_core::severity::Summary;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio_util::sync::CancellationToken;

use crate::store::MessageStore;

pub struct SummaryPublisher {
    store: Arc<MessageStore>,
    sender: watch::Sender<Summary>,
}

impl SummaryPublisher {
    /// Create the publisher and the receiver the display side watches.
    pub fn new(store: Arc<MessageStore>) -> (Self, watch::Receiver<Summary>) {
        let (sender, receiver) = watch::channel(Summary::default());
        (Self { store, sender }, receiver)
    }

    /// Run until `cancel` fires or the store's bus closes.
    pub async fn run(self, cancel: CancellationToken) {
        let mut changes = self.store.subscribe();
        self.refresh().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Summary publisher cancelled");
                    break;
                }
                event = changes.recv() => match event {
                    Ok(_) => self.refresh().await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Summary publisher lagged, re-querying");
                        self.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    async fn refresh(&self) {
        let summary = self.store.summary().await;
        self.sender.send_if_modified(|current| {
            if *current == summary {
                return false;
            }
            tracing::trace!(dominant = ?summary.dominant, count = summary.count, "Summary updated");
            *current = summary;
            true
        });
    }
}
