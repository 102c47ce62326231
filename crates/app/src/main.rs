//! `formcheck` -- headless form validation run.
//!
//! Loads the form definition, rule groups and record, validates the whole
//! record, applies the edits given on the command line and prints the
//! resulting message list and summary as JSON.
//!
//! ```text
//! formcheck forms/0/email=jane@example forms/0/hours=45
//! ```
//!
//! Values are parsed as JSON when possible and taken as text otherwise.
//! See [`AppConfig::from_env`] for the environment variables.

use std::sync::Arc;
use std::time::Duration;

use formcheck_app::config::AppConfig;
use formcheck_app::loader::JsonFileProvider;
use formcheck_app::navigation::{FieldControl, FieldRegistry, NavigationResolver, ScrollOffset, Viewport};
use formcheck_app::session::FormSession;
use formcheck_events::{MessageStore, SummaryPublisher};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stand-in for a live input when there is no UI attached.
struct HeadlessControl {
    id: String,
}

impl FieldControl for HeadlessControl {
    fn focus(&self) {
        tracing::info!(control = %self.id, "Focus");
    }
}

struct HeadlessViewport;

impl Viewport for HeadlessViewport {
    fn scroll_to(&self, _control: &dyn FieldControl, duration: Duration, offset: ScrollOffset) {
        tracing::info!(duration_ms = duration.as_millis() as u64, offset_y = offset.y, "Scroll");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formcheck=debug,formcheck_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    let rules = Arc::new(config.load_rule_book().await?);
    let form = Arc::new(config.load_form(&rules).await?);
    tracing::info!(form = %form.title(), fields = form.len(), "Loaded form definition");

    // --- Store + summary publisher ---
    let store = Arc::new(MessageStore::new());
    let (publisher, summary_rx) = SummaryPublisher::new(Arc::clone(&store));
    let cancel = CancellationToken::new();
    let publisher_handle = tokio::spawn(publisher.run(cancel.clone()));

    // --- Navigation ---
    let registry = Arc::new(FieldRegistry::new());
    let controls: Vec<Arc<HeadlessControl>> = form
        .fields()
        .filter_map(|f| f.control_id())
        .map(|id| Arc::new(HeadlessControl { id: id.to_string() }))
        .collect();
    for control in &controls {
        registry.register(control.id.clone(), control).await;
    }
    let navigation = Arc::new(NavigationResolver::new(
        registry,
        Arc::new(HeadlessViewport),
        config.navigation,
    )?);

    // --- Session ---
    let provider = JsonFileProvider::new(&config.data_root);
    let session = FormSession::start(
        Arc::clone(&form),
        rules,
        Arc::clone(&store),
        navigation,
        &provider,
        &config.record_path,
    )
    .await?;

    session.revalidate_all().await;

    for arg in std::env::args().skip(1) {
        let Some((target, raw)) = arg.split_once('=') else {
            anyhow::bail!("expected target=value, got '{arg}'");
        };
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        let state = session.on_field_change(target, value).await?;
        tracing::info!(field = %target, ?state, "Field changed");
    }

    let report = json!({
        "messages": session.message_list().await,
        "summary": session.summary().await,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    session.end().await;
    cancel.cancel();
    publisher_handle.await?;
    tracing::debug!(summary = ?*summary_rx.borrow(), "Final published summary");

    Ok(())
}
