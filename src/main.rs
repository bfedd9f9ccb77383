//! company_membership - Company Registration & Membership Backend API
//!
//! Registers companies with their membership requests and reports on recent
//! memberships and transfer activity.

use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use company_membership::config::{ConfigError, LogFormat};
use company_membership::db::{self, DbPool};
use company_membership::{api, Config};

/// Initialize tracing/logging
fn init_tracing(format: LogFormat) {
    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "company_membership=debug,tower_http=debug".into()),
        )
        .with(pretty)
        .with(json)
        .init();
}

/// Build the application router
fn build_router(pool: DbPool, config: &Config) -> Result<Router, ConfigError> {
    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .map_err(|_| ConfigError::InvalidValue("CORS_ORIGIN"))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(api::app(pool)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);

    let addr: SocketAddr = config.bind_address().parse()?;

    tracing::info!(environment = %config.environment, "Starting company_membership server");
    tracing::info!("Connecting to database...");

    db::ensure_database_dir(&config.database_url)?;

    let pool = db::connect(&config.database_url, config.database_max_connections).await?;
    db::verify_connection(&pool).await?;
    db::run_migrations(&pool).await?;

    // Verify database schema
    if !db::check_schema(&pool).await? {
        tracing::error!("Database schema is not complete. Please run migrations.");
        return Err(anyhow::anyhow!("Database schema incomplete"));
    }

    tracing::info!("Database connected successfully");
    tracing::info!("Listening on http://{}/api", addr);

    // Build router and start server
    let app = build_router(pool.clone(), &config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cleanup
    tracing::info!("Server shutting down...");
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
