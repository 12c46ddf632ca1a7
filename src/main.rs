use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use expense_api::config::AppConfig;
use expense_api::database::{DatabaseManager, ExpenseRepository};
use expense_api::server;
use expense_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and PORT
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("expense_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting Expense API in {:?} mode", config.environment);

    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect database")?;
    db.migrate().await.context("failed to initialize db schema")?;

    let state = AppState::new(Arc::new(ExpenseRepository::new(db.pool().clone())));
    let app = server::app(state, &config);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Expense API listening on http://{}", bind_addr);

    server::serve(listener, app, config.shutdown_timeout())
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("server shutdown");
    Ok(())
}
