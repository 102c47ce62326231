//! Activation of message-list entries: scroll immediately, focus after the
//! configured delay, and stay silent when the field has left the view.

mod common;

use std::time::Duration;

use common::{customer_record, harness, EMAIL, HOURS, NAME};
use formcheck_app::navigation::{Activation, ScrollOffset};
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn activation_scrolls_then_focuses() {
    let h = harness(customer_record()).await;
    h.session.on_field_change(NAME, json!("")).await.unwrap();

    assert_eq!(h.session.activate(NAME).await, Activation::Scheduled);
    assert_eq!(
        h.viewport.scrolls(),
        [(Duration::from_millis(200), ScrollOffset { x: 0, y: -100 })]
    );
    assert_eq!(h.control("inputName").focus_count(), 0);

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(h.control("inputName").focus_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn activation_of_field_out_of_view_does_nothing() {
    let mut h = harness(customer_record()).await;
    h.session.on_field_change(EMAIL, json!("bad")).await.unwrap();
    h.controls.remove("inputEmail");

    assert_eq!(h.session.activate(EMAIL).await, Activation::Stale);
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(h.viewport.scrolls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn activation_without_message_is_stale() {
    let h = harness(customer_record()).await;
    assert_eq!(h.session.activate(HOURS).await, Activation::Stale);
    assert!(h.viewport.scrolls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn later_activation_wins() {
    let h = harness(customer_record()).await;
    h.session.on_field_change(NAME, json!("")).await.unwrap();
    h.session.on_field_change(HOURS, json!(45)).await.unwrap();

    h.session.activate(NAME).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.session.activate(HOURS).await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(h.control("inputName").focus_count(), 0);
    assert_eq!(h.control("inputHours").focus_count(), 1);
    assert_eq!(h.viewport.scrolls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn ending_the_session_cancels_pending_focus() {
    let h = harness(customer_record()).await;
    h.session.on_field_change(NAME, json!("")).await.unwrap();

    h.session.activate(NAME).await;
    h.session.end().await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(h.control("inputName").focus_count(), 0);
}
