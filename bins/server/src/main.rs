//! Assessoria API Server
//!
//! Main entry point for the advisor dashboard backend.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assessoria_api::monitor::ReconciliationMonitor;
use assessoria_api::{AppState, create_router};
use assessoria_db::connect_with;
use assessoria_shared::{AppConfig, RunMode};

fn init_tracing(run_mode: RunMode) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "assessoria=debug,tower_http=debug".into());

    // JSON lines in production, human-readable output otherwise.
    let (pretty, json) = if run_mode.is_production() {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing(RunMode::from_env());

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(run_mode = config.run_mode.as_str(), "configuration loaded");

    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let state = AppState::new(&config, db);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = if config.monitor.enabled {
        Some(ReconciliationMonitor::new(&state, &config.monitor).spawn(shutdown_rx))
    } else {
        info!("reconciliation monitor disabled");
        None
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send(true).ok();
    if let Some(handle) = monitor {
        handle.await.context("monitor task panicked")?;
    }

    Ok(())
}
