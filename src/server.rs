//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, worker spawning, and Axum server lifecycle.

use crate::application::cleanup_worker::run_cleanup_worker;
use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::domain::repositories::LinkStore;
use crate::infrastructure::persistence::{MemoryLinkStore, RedisLinkStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens the configured link store.
///
/// Redis is used when configured, otherwise links are kept in memory. A
/// configured but unreachable Redis is an error; there is no silent fallback
/// to memory.
///
/// # Errors
///
/// Returns an error if the Redis connection or its PING fails.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn LinkStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let store = RedisLinkStore::connect(redis_url, config.redis_key_prefix.clone())
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Link store: redis");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("Link store: memory (links are lost on restart)");
            Ok(Arc::new(MemoryLinkStore::new()))
        }
    }
}

/// Builds the link service on top of `store` using wall-clock time.
///
/// # Errors
///
/// Returns an error if the code generator settings are invalid.
pub fn build_link_service(
    config: &Config,
    store: Arc<dyn LinkStore>,
) -> Result<Arc<LinkService<dyn LinkStore>>> {
    let settings = config.shortener_settings()?;

    Ok(Arc::new(LinkService::new(
        store,
        Arc::new(SystemClock),
        settings,
    )))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (Redis or memory)
/// - Background cleanup worker, unless disabled
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;
    let link_service = build_link_service(&config, store)?;

    let cleanup_task = match config.cleanup_interval() {
        Some(period) => Some(tokio::spawn(run_cleanup_worker(
            link_service.clone(),
            period,
        ))),
        None => {
            tracing::info!("Background cleanup disabled");
            None
        }
    };

    let state = AppState::new(link_service, config.base_url.clone());
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = cleanup_task {
        task.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
