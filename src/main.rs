//! Casaflow Backend Service
//!
//! Main entry point for the Casaflow property rental backend.
//! This service provides:
//! - Form-encoded HTTP API for owners, bidders and tenants
//! - Payment reminders dispatched via the configured mail relay
//! - Upload storage for property and profile photos

use casaflow_backend::config::AppConfig;
use casaflow_backend::database::{create_pool, run_migrations};
use casaflow_backend::notifier::mailer_from_config;
use casaflow_backend::{http, AppError, AppResult, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    // Initialize tracing/logging with config
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("casaflow_backend={},sqlx=warn", config.log_level).into()
            }),
        )
        .init();

    info!("Casaflow backend starting");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);

    // The SQLite file and the upload directory both live under data/
    if let Some(parent) = sqlite_file_parent(&config.database.url) {
        if let Err(e) = std::fs::create_dir_all(&parent) {
            warn!("Could not create database directory {}: {}", parent, e);
        }
    }
    if let Err(e) = std::fs::create_dir_all(&config.upload.dir) {
        warn!(
            "Could not create upload directory {}: {}",
            config.upload.dir.display(),
            e
        );
    }

    info!("Connecting to database...");

    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;

    info!("Database connection pool created successfully");
    info!("Max connections: {}", config.database.max_connections);

    info!("Running database migrations...");
    run_migrations(&pool, None).await.map_err(|e| {
        error!("Database migration failed: {}", e);
        AppError::Database(e)
    })?;

    info!("Database migrations completed successfully");

    let mailer = mailer_from_config(&config.mail)?;
    match &config.mail.relay_url {
        Some(url) => info!("Mail relay: {}", url),
        None => warn!("MAIL_RELAY_URL not configured - emails will be logged, not sent"),
    }

    let http_port = config.http_port;
    let state = AppState::new(pool, mailer, config);
    info!("Application state initialized with repositories");

    let app = http::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid HTTP address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Message(format!("Failed to bind HTTP server: {}", e)))?;

    info!("HTTP server listening on {}", addr);
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Message(format!("HTTP server error: {}", e)))?;

    info!("Casaflow backend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    } else {
        info!("Shutdown signal received, shutting down gracefully...");
    }
}

/// Directory holding the SQLite file named by a `sqlite://` URL, if any
fn sqlite_file_parent(url: &str) -> Option<String> {
    let path = url.strip_prefix("sqlite://").unwrap_or(url);
    if path == ":memory:" || path.starts_with("file::memory:") {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().into_owned())
}
