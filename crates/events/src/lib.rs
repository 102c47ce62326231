//! Message store and change notification.
//!
//! - [`MessageStore`]: the authoritative set of active validation messages,
//!   at most one per field target.
//! - [`ChangeBus`]: payload-free "store changed" notifications backed by
//!   `tokio::sync::broadcast`.
//! - [`SummaryPublisher`]: background task that keeps the summary indicator
//!   current.

pub mod bus;
pub mod store;
pub mod summary;

pub use bus::{ChangeBus, StoreEvent};
pub use store::MessageStore;
pub use summary::SummaryPublisher;
