//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, resolver and cache setup, worker spawning,
//! and the Axum server lifecycle.

use crate::application::services::{RoutingEngine, ShortLinkResolver, TenantResolver};
use crate::config::Config;
use crate::domain::analytics_worker::{EventSink, run_analytics_worker};
use crate::domain::host::HostClassifier;
use crate::infrastructure::persistence::{
    PgAnalyticsRepository, PgShortLinkRepository, PgTenantRepository,
};
use crate::routes::{app_router, standalone_downstream};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound on draining queued analytics after shutdown.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Tenant resolver with its caches and sweepers
/// - Background analytics worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the server stops accepting connections, the event queue is
/// closed and the worker drains what is already queued.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let tenant_repository = Arc::new(PgTenantRepository::new(pool.clone()));
    let short_link_repository = Arc::new(PgShortLinkRepository::new(pool.clone()));
    let analytics_repository = Arc::new(PgAnalyticsRepository::new(pool.clone()));

    let (event_tx, event_rx) = mpsc::channel(config.event_queue_capacity);
    let worker = tokio::spawn(run_analytics_worker(
        event_rx,
        analytics_repository,
        config.event_worker_concurrency,
    ));
    tracing::info!("Analytics worker started");
    let events = EventSink::new(event_tx);

    let tenants = Arc::new(TenantResolver::new(
        tenant_repository,
        config.resolver_settings(),
    ));
    let sweepers = tenants.spawn_sweepers(config.cache_sweep_interval());

    let engine = Arc::new(RoutingEngine::new(
        HostClassifier::new(&config.base_domains),
        tenants.clone(),
        events.clone(),
        config.retry_after_seconds,
    ));
    let short_links = Arc::new(ShortLinkResolver::new(
        short_link_repository,
        tenants,
        events.clone(),
        config.lookup_timeout(),
    ));

    let state = AppState::new(
        engine,
        short_links,
        events,
        config.behind_proxy,
        config.retry_after_seconds,
    );

    let app = app_router(state, standalone_downstream());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining analytics queue");

    for sweeper in sweepers {
        sweeper.abort();
    }

    // The serve future owned the last event senders; once it is dropped the
    // worker sees a closed channel and exits after finishing queued effects.
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Analytics worker failed: {}", e),
        Err(_) => tracing::warn!(
            "Analytics worker did not drain within {:?}, dropping remaining events",
            WORKER_DRAIN_TIMEOUT
        ),
    }

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
