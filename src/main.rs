mod alerts;
mod api_doc;
mod chat;
mod config;
mod error;
mod formatter;
mod handlers;
mod models;
mod parser;
mod routes;
mod service;
mod state;
mod store;
mod tips;

use anyhow::Context;
use config::Config;
use service::FinanceService;
use state::AppState;
use std::sync::Arc;
use store::JsonStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("finapp=info,tower_http=info")),
        )
        .init();

    tracing::info!("finapp starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = JsonStore::from_config(&config).await?;
    tracing::info!("Using data file {}", store.path().display());
    let state = AppState {
        service: FinanceService::new(store),
        config: Arc::new(config.clone()),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind((config.service_host.as_str(), config.service_port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.service_host, config.service_port
            )
        })?;
    tracing::info!(
        "Listening on {} (docs at {})",
        listener.local_addr()?,
        routes::SWAGGER_UI
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
