use analytics::AnalyticsEngine;
use api_client::{FearGreedClient, FeedCache, FeedClient};
use axum::{Router, routing::get};
use configuration::{Config, DashboardConfig};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod chart;
pub mod error;
pub mod handlers;
pub mod page;
pub mod pipeline;

pub use chart::ScatterChart;
pub use pipeline::{DashboardView, build_report, load_view};

/// The shared application state that all handlers can access.
///
/// Reports are rebuilt per request; only the feed client's cache persists.
pub struct AppState {
    pub feed: Arc<dyn FeedClient>,
    pub engine: AnalyticsEngine,
    pub dashboard: DashboardConfig,
    pub chart: ScatterChart,
}

impl AppState {
    /// Wires the live CNN client and the analytics engine from `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = FeedCache::new(config.cache.ttl);
        let client = FearGreedClient::new(&config.feed, cache)?;
        Ok(Self {
            feed: Arc::new(client),
            engine: AnalyticsEngine::new(config.analysis.window_size)?,
            dashboard: config.dashboard.clone(),
            chart: ScatterChart::default(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/chart.svg", get(handlers::chart_svg))
        .route("/api/report", get(handlers::get_report))
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves the dashboard until Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Dashboard stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
    }
}
