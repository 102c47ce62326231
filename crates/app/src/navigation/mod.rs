//! Field navigation: locating a message's field in the live view and
//! scrolling to and focusing it.
//!
//! Scrolling and focusing are host capabilities, supplied as trait objects.

pub mod registry;
pub mod resolver;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use registry::FieldRegistry;
pub use resolver::{Activation, NavigationResolver};

/// A live input control as seen by the host UI.
pub trait FieldControl: Send + Sync {
    fn focus(&self);
}

/// The scroll container the form lives in.
pub trait Viewport: Send + Sync {
    /// Scroll so that `control` is visible, animating over `duration`.
    fn scroll_to(&self, control: &dyn FieldControl, duration: Duration, offset: ScrollOffset);
}

/// Offset applied to the scroll target, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}
