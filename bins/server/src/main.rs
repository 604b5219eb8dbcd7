//! HRMS API Server
//!
//! Main entry point for the HRMS backend service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hrms_api::{AppState, create_router};
use hrms_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrms=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = hrms_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.database.run_migrations {
        hrms_db::migrate(&db).await.context("Failed to run migrations")?;
    }

    hrms_api::imports::fail_interrupted(&db)
        .await
        .context("Failed to settle interrupted imports")?;

    info!(
        max_upload_bytes = config.import.max_upload_bytes,
        async_row_threshold = config.import.async_row_threshold,
        stats_ttl_secs = config.cache.stats_ttl_secs,
        "Import and cache settings"
    );

    // Spawns the notification subscriber and the import worker
    let state = AppState::new(db, &config);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
