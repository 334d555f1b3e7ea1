// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::dataset_service::DatasetService;
use crate::application::normalizer::Normalizer;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::json_repository::JsonFileRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    filter_options, get_asset, get_dashboard, health_check, list_assets, list_markers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(JsonFileRepository::new(config.dataset.path.clone()));

    // Load the dataset once; it is immutable for the lifetime of the process
    let dataset_service = DatasetService::new(repository, Normalizer::new(config.aliases.clone()));
    let dataset = Arc::new(dataset_service.load().await?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(dataset);

    // Create application state
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/assets", get(list_assets))
        .route("/assets/:id", get(get_asset))
        .route("/markers", get(list_markers))
        .route("/filters", get(filter_options))
        .route("/dashboard", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.listen;
    tracing::info!("Starting climate-risk-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
