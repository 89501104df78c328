//! # Pie Service
//!
//! Explicitly constructed service object: configuration plus the
//! collaborators (repository, logger, error pipeline) every handler shares.

use std::io;
use std::sync::Arc;

use axum::{middleware, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{ErrorLog, FileErrorLog, RequestLogger, TracingRequestLogger};
use crate::repository::{FilePieRepository, MemoryPieRepository, PieRepository, RepositoryError};

use super::config::ServiceConfig;
use super::middleware::handle_response;
use super::pie_routes::{pie_routes, route_not_found_handler};
use super::pipeline::ErrorPipeline;

/// Errors raised while assembling the service
#[derive(Debug, Error)]
pub enum ServiceSetupError {
    #[error("Failed to open pie data: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Failed to open error log: {0}")]
    ErrorLog(#[from] io::Error),
}

/// State shared across handlers
pub struct ServiceState {
    pub repository: Arc<dyn PieRepository>,
    pub logger: Arc<dyn RequestLogger>,
    pub errors: ErrorPipeline,
}

/// The pie HTTP service
pub struct PieService {
    config: ServiceConfig,
    state: Arc<ServiceState>,
}

impl PieService {
    /// Assemble a service from explicit collaborators
    pub fn new(
        config: ServiceConfig,
        repository: Arc<dyn PieRepository>,
        logger: Arc<dyn RequestLogger>,
        error_log: Arc<dyn ErrorLog>,
    ) -> Self {
        let state = Arc::new(ServiceState {
            repository,
            logger,
            errors: ErrorPipeline::standard(error_log),
        });
        Self { config, state }
    }

    /// Assemble the production service described by `config`
    pub async fn from_config(config: ServiceConfig) -> Result<Self, ServiceSetupError> {
        let repository: Arc<dyn PieRepository> = match &config.data_file {
            Some(path) => Arc::new(FilePieRepository::open(path).await?),
            None => Arc::new(MemoryPieRepository::new()),
        };
        let error_log = Arc::new(FileErrorLog::open(&config.error_log)?);

        Ok(Self::new(
            config,
            repository,
            Arc::new(TracingRequestLogger),
            error_log,
        ))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Build the router with all endpoints
    pub fn router(&self) -> Router {
        Router::new()
            .merge(pie_routes(self.config.route_prefix()))
            .fallback(route_not_found_handler)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                handle_response,
            ))
            .layer(self.cors())
            .with_state(self.state.clone())
    }

    fn cors(&self) -> CorsLayer {
        if self.config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = self
                .config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }

    /// Bind the listener and serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr = self.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(
            addr = %addr,
            base_path = %self.config.base_path,
            "pie service listening on http://{}{}",
            addr,
            self.config.route_prefix()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down pie service");
}
