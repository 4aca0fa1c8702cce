//! ServerBuilder for fluent API to build the wizard HTTP server

use super::handlers::AppState;
use super::router::build_order_routes;
use crate::config::WizardConfig;
use crate::core::events::EventBus;
use crate::core::service::{ApprovalNotifier, ExportSink};
use crate::export::LoggingApprovalNotifier;
use crate::storage::open_backend;
use crate::store::{OrderStore, SharedStore};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the order wizard server
///
/// Without an explicit store, [`build_state`](Self::build_state) opens the
/// backend named in the configuration and rehydrates from it.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(WizardConfig::from_yaml_file("wizard.yaml")?)
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: WizardConfig,
    store: Option<SharedStore>,
    notifier: Option<Arc<dyn ApprovalNotifier>>,
    export_sink: Option<Arc<dyn ExportSink>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: WizardConfig::default(),
            store: None,
            notifier: None,
            export_sink: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: WizardConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already opened store instead of the configured backend
    pub fn with_store(mut self, store: impl Into<SharedStore>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_notifier(mut self, notifier: impl ApprovalNotifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn with_export_sink(mut self, sink: impl ExportSink + 'static) -> Self {
        self.export_sink = Some(Arc::new(sink));
        self
    }

    /// Add routes that live next to the order routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Assemble handler state, opening the store if none was given
    pub fn build_state(&mut self) -> Result<AppState> {
        self.config.validate()?;

        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let backend = open_backend(&self.config.storage)?;
                let events = EventBus::new(self.config.event_bus_capacity);
                SharedStore::new(OrderStore::open(backend)?.with_event_bus(events))
            }
        };

        let notifier = self
            .notifier
            .take()
            .unwrap_or_else(|| Arc::new(LoggingApprovalNotifier));

        Ok(AppState {
            store,
            config: Arc::new(self.config.clone()),
            notifier,
            export_sink: self.export_sink.take().or_else(|| self.configured_sink()),
        })
    }

    #[cfg(feature = "trello")]
    fn configured_sink(&self) -> Option<Arc<dyn ExportSink>> {
        self.config.trello_if_configured().map(|trello| {
            Arc::new(crate::export::TrelloExportSink::new(trello.clone())) as Arc<dyn ExportSink>
        })
    }

    #[cfg(not(feature = "trello"))]
    fn configured_sink(&self) -> Option<Arc<dyn ExportSink>> {
        if self.config.trello_if_configured().is_some() {
            tracing::warn!("trello settings present but built without the `trello` feature");
        }
        None
    }

    /// Build the final router with tracing and CORS layers
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = build_order_routes(state);
        for custom in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
