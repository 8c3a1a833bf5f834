pub mod api;

use crate::services::{Dashboard, MarketDataProvider};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Dashboard over any provider, shared between handlers
pub type SharedDashboard = Arc<Dashboard<Arc<dyn MarketDataProvider>>>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(dashboard: SharedDashboard) -> Self {
        Self {
            dashboard,
            started_at: Instant::now(),
        }
    }
}

/// Build the router with every route registered
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health_handler))
        .route("/companies", get(api::list_companies_handler))
        .route("/companies/{symbol}", get(api::company_handler))
        .route("/companies/{symbol}/info", get(api::information_handler))
        .route("/companies/{symbol}/profile", get(api::profile_handler))
        .route("/companies/{symbol}/technical", get(api::technical_handler))
        .route("/companies/{symbol}/financials", get(api::financials_handler))
        .route("/companies/{symbol}/ratios", get(api::ratios_handler))
        .route("/companies/{symbol}/news", get(api::news_handler))
        .route("/companies/{symbol}/chart", get(api::chart_handler))
        .route("/companies/{symbol}/stats", get(api::stats_handler))
        .route("/companies/{symbol}/history", get(api::history_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(dashboard: SharedDashboard, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting bistscope server");

    tracing::info!("Registering routes:");
    tracing::info!("  GET /health");
    tracing::info!("  GET /companies?search=akb");
    tracing::info!("  GET /companies/{{symbol}}[/info|/profile|/technical|/financials|/ratios|/news]");
    tracing::info!("  GET /companies/{{symbol}}/chart?window=500&chart=line&column=close&model=sma");
    tracing::info!("  GET /companies/{{symbol}}/stats?window=500&model=sma");
    tracing::info!("  GET /companies/{{symbol}}/history?window=500&chart=candlestick&format=csv");

    let app = router(AppState::new(dashboard));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
