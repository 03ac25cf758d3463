//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{normalize_error_response, ObservabilityLayer};
use crate::migration;
use crate::openapi;
use crate::repository::BranchOfficeRepositoryImpl;
use crate::service::BranchOfficeService;
use crate::state::HasServices;
use crate::telemetry;
use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// How often pool gauges are refreshed when metrics are enabled
const POOL_STATS_INTERVAL: Duration = Duration::from_secs(15);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub branch_office_service: Arc<BranchOfficeService<BranchOfficeRepositoryImpl>>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Config, db_pool: PgPool, prometheus_handle: Option<PrometheusHandle>) -> Self {
        let branch_office_repo = Arc::new(BranchOfficeRepositoryImpl::new(db_pool.clone()));
        let branch_office_service = Arc::new(BranchOfficeService::new(branch_office_repo));

        Self {
            config: Arc::new(config),
            db_pool,
            branch_office_service,
            prometheus_handle,
        }
    }
}

impl HasServices for AppState {
    type BranchOfficeRepo = BranchOfficeRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn branch_office_service(&self) -> &BranchOfficeService<Self::BranchOfficeRepo> {
        &self.branch_office_service
    }

    fn prometheus_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Connect to the database with the configured pool limits
pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database");
    Ok(pool)
}

/// Run the server
pub async fn run(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
    skip_migrations: bool,
) -> Result<()> {
    let db_pool = connect(&config).await?;

    if !skip_migrations {
        migration::apply(&db_pool).await?;
    }

    if prometheus_handle.is_some() {
        let pool = db_pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POOL_STATS_INTERVAL);
            loop {
                interval.tick().await;
                telemetry::metrics::record_pool_stats(&pool);
            }
        });
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool.clone(), prometheus_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Build the HTTP router with generic state type
///
/// Generic over the state so production `AppState` and test states that
/// implement `HasServices` share one route table.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_timeout = Duration::from_secs(state.config().request_timeout_secs);

    Router::new()
        // Operational endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/metrics", get(api::metrics::metrics_handler::<S>))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        // Branch offices
        .route("/branch-offices", get(api::branch_office::list::<S>))
        .route(
            "/branch-offices/simple",
            get(api::branch_office::list_simple::<S>),
        )
        .route("/branch-office", post(api::branch_office::create::<S>))
        .route(
            "/branch-office/{id}",
            get(api::branch_office::show::<S>)
                .put(api::branch_office::update::<S>)
                .delete(api::branch_office::soft_delete::<S>)
                .patch(api::branch_office::restore::<S>),
        )
        .route(
            "/branch-office/hard-delete/{id}",
            delete(api::branch_office::hard_delete::<S>),
        )
        // Innermost first: timeouts are normalized to JSON like any other error
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
