//! Order wizard REST server
//!
//! ```bash
//! cargo run --example wizard_server -- wizard.yaml
//! ```
//!
//! Without a config path the defaults apply: in-memory storage on
//! 127.0.0.1:3000. `WIZARD_*` environment variables override either.

use order_wizard::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WizardConfig::from_yaml_file(&path)?,
        None => WizardConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;

    let backend = open_backend(&config.storage)?;
    let store = OrderStore::open(backend)?.with_event_bus(EventBus::new(config.event_bus_capacity));

    let mut events = store.events().subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = events.recv().await {
            tracing::debug!(
                order_id = %envelope.event.order_id(),
                action = envelope.event.action(),
                "order event"
            );
        }
    });

    let bind = config.server.bind.clone();
    tracing::info!(backend = ?config.storage.backend, "starting order wizard");

    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve(&bind)
        .await
}
