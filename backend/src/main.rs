//! Coach Backend
//!
//! Serves the calorie calculator, the plan regeneration limiter and the
//! analytics intake for the mobile coaching app.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Business logic (calorie engine, cooldowns, analytics dispatch)
//! - Repositories: Regeneration timestamps (memory or PostgreSQL)

use anyhow::Result;
use coach_backend::{
    config::{self, AnalyticsSinkKind, RegenerationStoreKind},
    db,
    repositories::{InMemoryRegenerationStore, PgRegenerationStore, RegenerationStore},
    routes,
    services::AnalyticsService,
    state::AppState,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Coach Backend"
    );

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let metrics = if config.metrics.enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    let store = create_regeneration_store(&config).await?;
    let analytics = AnalyticsService::from_config(&config.analytics)?;
    info!(
        sink = analytics.sink_name(),
        fail_open = config.rate_limit.fail_open,
        cooldown_hours = config.rate_limit.cooldown_hours,
        "Services initialized"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = AppState::new(config, store, analytics, metrics)?;

    // Build application
    let app = routes::create_router(state);

    // Start server
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Pick the regeneration store named in the configuration
async fn create_regeneration_store(config: &config::AppConfig) -> Result<Arc<dyn RegenerationStore>> {
    let store: Arc<dyn RegenerationStore> = match config.rate_limit.store {
        RegenerationStoreKind::Memory => {
            info!("Using in-memory regeneration store");
            Arc::new(InMemoryRegenerationStore::new())
        }
        RegenerationStoreKind::Postgres => {
            info!("Connecting to database...");
            let pool =
                db::create_pool(&config.database.url, config.database.max_connections).await?;

            // Skip in production if using separate migration job
            if !config::AppConfig::is_production() {
                db::run_migrations(&pool).await?;
            }

            Arc::new(PgRegenerationStore::new(pool))
        }
    };

    Ok(store)
}

/// Install the global Prometheus recorder
fn install_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "coach_backend=info,analytics=info,tower_http=info".into()
        } else {
            "coach_backend=debug,analytics=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.analytics.sink == AnalyticsSinkKind::Http && config.analytics.api_secret.is_none() {
        errors.push("analytics.api_secret is required for the http sink");
    }

    if config.rate_limit.store == RegenerationStoreKind::Memory {
        warn!("Regeneration cooldowns are kept in memory and reset on restart");
    }

    let local_db = config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1");
    if config.rate_limit.store == RegenerationStoreKind::Postgres && local_db {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
