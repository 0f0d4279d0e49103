use anyhow::Context;
use tracing_subscriber::EnvFilter;

use trivia_cafe_api::config::AppConfig;
use trivia_cafe_api::database::open_store;
use trivia_cafe_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Trivia Cafe API in {:?} mode", config.environment);
    if trivia_cafe_api::is_development!(config) && std::env::var("AUTH_JWT_SECRET").is_err() {
        tracing::warn!("AUTH_JWT_SECRET not set; tokens are verified with the development secret");
    }

    let store = open_store(&config.database)
        .await
        .context("failed to open store")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Trivia Cafe API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;

    Ok(())
}
