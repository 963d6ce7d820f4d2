//! HTTP server with startup dataset check and graceful shutdown

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    handlers::router,
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
    state::AppState,
};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the dataset once and fail if it is unusable
    ///
    /// This is the fatal channel: a dataset that cannot be read or parsed at
    /// startup stops the process before the port is bound. Failures after
    /// startup are reported per request.
    pub fn check_dataset(state: &AppState) -> Result<usize> {
        let records = state.store().load()?;
        tracing::info!(records = records.len(), "Dataset check passed");
        Ok(records.len())
    }

    /// Router with the full middleware stack applied
    pub fn app(&self, state: AppState) -> Router {
        // Layers are applied in reverse order (bottom layer is innermost)
        router(state)
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
            .layer(CatchPanicLayer::new())
    }

    /// Check the dataset, bind the configured port and serve until SIGINT/SIGTERM
    pub async fn serve(self) -> Result<()> {
        let state = AppState::new(self.config.clone());
        Self::check_dataset(&state)?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));
        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_config();

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Server listening on {}", addr);

        self.serve_with_listener(listener, state, shutdown_signal())
            .await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_listener<F>(
        self,
        listener: TcpListener,
        state: AppState,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.app(state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn log_config(&self) {
        tracing::info!(
            "  - Dataset: {}",
            self.config.search.dataset_path.display()
        );
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!("  - Panic recovery: enabled");
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    #[test]
    fn test_missing_dataset_is_fatal_at_startup() {
        let mut config = Config::default();
        config.search.dataset_path = "/nonexistent/dataset.xml".into();
        let state = AppState::new(config);

        let err = Server::check_dataset(&state).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_bundled_dataset_passes_startup_check() {
        let mut config = Config::default();
        config.search.dataset_path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("dataset.xml");
        let state = AppState::new(config);

        assert_eq!(Server::check_dataset(&state).unwrap(), 35);
    }
}
