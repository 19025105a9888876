// src/main.rs

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use teamdeck::api::http::app_router;
use teamdeck::config::CONFIG;
use teamdeck::db::run_migrations;
use teamdeck::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let level = CONFIG.logging.level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting teamdeck backend");

    let pool = SqlitePoolOptions::new()
        .max_connections(CONFIG.database.max_connections)
        .connect(&CONFIG.database.url)
        .await?;

    run_migrations(&pool).await?;
    info!("Database migrations applied");

    let state = Arc::new(AppState::new(pool));
    let app = app_router(state);

    let bind_address = CONFIG.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("API available at http://{}/api", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received: closing HTTP server");
    }
}
