//! Scroll-then-focus choreography.
//!
//! Activating a message scrolls the viewport to its field right away and
//! schedules the focus step `focus_delay` later. Only one focus step is ever
//! pending: a new activation cancels the previous one, so focus never lands
//! on a field the user has moved away from.

use std::sync::Arc;

use formcheck_core::error::CoreError;
use formcheck_core::form::FieldDescriptor;
use formcheck_core::message::ValidationMessage;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{FieldRegistry, Viewport};
use crate::config::NavigationConfig;

/// Outcome of [`NavigationResolver::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Scrolled; focus is pending.
    Scheduled,
    /// The field is not in the live view (any more). Nothing happened.
    Stale,
}

pub struct NavigationResolver {
    registry: Arc<FieldRegistry>,
    viewport: Arc<dyn Viewport>,
    config: NavigationConfig,
    pending: Mutex<Option<CancellationToken>>,
}

impl NavigationResolver {
    /// Fails if the configured focus delay would let focus run before the
    /// scroll has finished.
    pub fn new(
        registry: Arc<FieldRegistry>,
        viewport: Arc<dyn Viewport>,
        config: NavigationConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            registry,
            viewport,
            config,
            pending: Mutex::new(None),
        })
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    /// Whether the field's control can currently be located.
    pub async fn is_navigable(&self, field: &FieldDescriptor) -> bool {
        self.resolves(field.control_id()).await
    }

    /// Whether a message's title should be presented as clickable.
    pub async fn is_message_navigable(&self, msg: &ValidationMessage) -> bool {
        msg.has_control() && self.resolves(msg.control_id.as_deref()).await
    }

    async fn resolves(&self, control_id: Option<&str>) -> bool {
        match control_id {
            Some(id) => self.registry.resolve(id).await.is_some(),
            None => false,
        }
    }

    /// Scroll to the message's field, then focus it after the configured
    /// delay.
    ///
    /// Any focus step still pending from an earlier activation is cancelled
    /// first, even when this activation turns out to be stale.
    pub async fn activate(&self, msg: &ValidationMessage) -> Activation {
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.take() {
            previous.cancel();
        }

        let control = match msg.control_id.as_deref() {
            Some(id) => self.registry.resolve(id).await,
            None => None,
        };
        let Some(control) = control else {
            tracing::debug!(field = %msg.target, "Activation target no longer in view");
            return Activation::Stale;
        };

        self.viewport.scroll_to(
            control.as_ref(),
            self.config.scroll_duration,
            self.config.scroll_offset,
        );

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let weak = Arc::downgrade(&control);
        drop(control);
        let delay = self.config.focus_delay;
        let target = msg.target.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::trace!(field = %target, "Pending focus cancelled");
                }
                _ = tokio::time::sleep(delay) => match weak.upgrade() {
                    Some(control) => control.focus(),
                    None => tracing::debug!(field = %target, "Control dropped before focus"),
                },
            }
        });

        *pending = Some(cancel);
        Activation::Scheduled
    }

    /// Cancel the pending focus step, if any. Returns whether one was pending.
    pub async fn cancel_pending(&self) -> bool {
        match self.pending.lock().await.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{FieldControl, ScrollOffset};
    use formcheck_core::severity::Severity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Input {
        focused: AtomicUsize,
    }

    impl FieldControl for Input {
        fn focus(&self) {
            self.focused.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Focus counter that outlives the control itself.
    struct CountingInput {
        focused: Arc<AtomicUsize>,
    }

    impl FieldControl for CountingInput {
        fn focus(&self) {
            self.focused.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct Page {
        scrolls: std::sync::Mutex<Vec<(Duration, ScrollOffset)>>,
    }

    impl Viewport for Page {
        fn scroll_to(&self, _control: &dyn FieldControl, duration: Duration, offset: ScrollOffset) {
            self.scrolls.lock().unwrap().push((duration, offset));
        }
    }

    fn resolver(page: Arc<Page>) -> NavigationResolver {
        NavigationResolver::new(
            Arc::new(FieldRegistry::new()),
            page,
            NavigationConfig::default(),
        )
        .unwrap()
    }

    fn message(control_id: &str) -> ValidationMessage {
        ValidationMessage::new("forms/0/name", Severity::Error, "m")
            .with_control_id(Some(control_id.to_string()))
    }

    #[tokio::test(start_paused = true)]
    async fn scrolls_immediately_and_focuses_after_delay() {
        let page = Arc::new(Page::default());
        let nav = resolver(Arc::clone(&page));
        let input = Arc::new(Input::default());
        nav.registry().register("inputName", &input).await;

        assert_eq!(nav.activate(&message("inputName")).await, Activation::Scheduled);
        assert_eq!(
            page.scrolls.lock().unwrap().as_slice(),
            [(Duration::from_millis(200), ScrollOffset { x: 0, y: -100 })]
        );

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(input.focused.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(input.focused.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unresolvable_control_is_a_silent_no_op() {
        let page = Arc::new(Page::default());
        let nav = resolver(Arc::clone(&page));
        let input = Arc::new(Input::default());
        nav.registry().register("inputName", &input).await;
        drop(input);

        assert_eq!(nav.activate(&message("inputName")).await, Activation::Stale);
        assert!(page.scrolls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn second_activation_cancels_first_focus() {
        let page = Arc::new(Page::default());
        let nav = resolver(Arc::clone(&page));
        let first = Arc::new(Input::default());
        let second = Arc::new(Input::default());
        nav.registry().register("first", &first).await;
        nav.registry().register("second", &second).await;

        nav.activate(&message("first")).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        nav.activate(&message("second")).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(first.focused.load(Ordering::SeqCst), 0);
        assert_eq!(second.focused.load(Ordering::SeqCst), 1);
        assert_eq!(page.scrolls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn control_dropped_during_delay_is_not_focused() {
        let page = Arc::new(Page::default());
        let nav = resolver(page);
        let focused = Arc::new(AtomicUsize::new(0));
        let input = Arc::new(CountingInput {
            focused: Arc::clone(&focused),
        });
        nav.registry().register("inputName", &input).await;

        assert_eq!(nav.activate(&message("inputName")).await, Activation::Scheduled);
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(input);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(focused.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_stops_focus() {
        let page = Arc::new(Page::default());
        let nav = resolver(page);
        let input = Arc::new(Input::default());
        nav.registry().register("inputName", &input).await;

        nav.activate(&message("inputName")).await;
        assert!(nav.cancel_pending().await);
        assert!(!nav.cancel_pending().await);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(input.focused.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn navigability_requires_a_live_control() {
        let nav = resolver(Arc::new(Page::default()));
        let input = Arc::new(Input::default());
        nav.registry().register("inputName", &input).await;

        let with_control = FieldDescriptor::new("a", "A").with_control_id("inputName");
        let unregistered = FieldDescriptor::new("b", "B").with_control_id("inputOther");
        let without = FieldDescriptor::new("c", "C");

        assert!(nav.is_navigable(&with_control).await);
        assert!(!nav.is_navigable(&unregistered).await);
        assert!(!nav.is_navigable(&without).await);
        assert!(nav.is_message_navigable(&message("inputName")).await);
    }

    #[test]
    fn focus_before_scroll_end_is_rejected() {
        let config = NavigationConfig {
            focus_delay: Duration::from_millis(100),
            ..NavigationConfig::default()
        };
        let result = NavigationResolver::new(
            Arc::new(FieldRegistry::new()),
            Arc::new(Page::default()),
            config,
        );
        assert!(result.is_err());
    }
}
