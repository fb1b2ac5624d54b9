//! GDELT dashboard API server.

use gdelt_api::config::ApiConfig;
use gdelt_api::server::{self, AppState};
use gdelt_functions::builtin_catalog;
use gdelt_params::CategoryTables;
use gdelt_render::HttpPlotRenderer;
use gdelt_scheduler::{InMemoryJobRegistry, JobRegistry};
use gdelt_types::PlotRenderer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let tables = CategoryTables::load(&config.resources)?;
    let renderer = HttpPlotRenderer::from_env();
    tracing::info!(url = %renderer.url(), "plot renderer configured");
    let renderer: Arc<dyn PlotRenderer> = Arc::new(renderer);

    let catalog = Arc::new(builtin_catalog(&tables, renderer));
    let registry = InMemoryJobRegistry::<String>::new(config.workers);
    tracing::info!(functions = catalog.len(), workers = registry.workers(), "catalog ready");
    let jobs: Arc<dyn JobRegistry<String>> = Arc::new(registry);

    let app = server::router(Arc::new(AppState { catalog, jobs }));
    tracing::info!("GDELT API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
