//! # Metrics Server
//!
//! HTTP listener serving Prometheus metrics plus liveness/readiness probes.
//!
//! Both metrics listeners (operator-process and custom-resource) are
//! instances of this server over different registries and bind addresses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, Registry, TextEncoder};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared server state for readiness reporting.
#[derive(Debug)]
pub struct ServerState {
    /// Set once the listener is bound and accepting connections
    pub is_ready: Arc<AtomicBool>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            is_ready: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct AppState {
    registry: Registry,
    state: Arc<ServerState>,
}

/// Serve `/metrics`, `/healthz`, and `/readyz` on the given address.
///
/// Marks `state.is_ready` once the listener is bound, then serves until the
/// process exits.
pub async fn start_server(addr: &str, registry: Registry, state: Arc<ServerState>) -> Result<()> {
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            registry,
            state: state.clone(),
        });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {addr}"))?;
    info!(%addr, "Metrics server listening");
    state.is_ready.store(true, Ordering::Relaxed);

    axum::serve(listener, app)
        .await
        .context("metrics server exited")?;
    Ok(())
}

/// Render the registry in the Prometheus text format.
async fn metrics_handler(State(app): State<AppState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&app.registry.gather(), &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain".to_string())],
            format!("failed to encode metrics: {e}"),
        );
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        String::from_utf8_lossy(&buffer).into_owned(),
    )
}

/// Wait for a spawned metrics server to become ready.
///
/// Polls the ready flag, failing if the server task exits or the startup
/// timeout elapses. This ensures probes pass immediately after startup.
pub async fn wait_until_ready(
    state: &Arc<ServerState>,
    handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let startup_timeout =
        std::time::Duration::from_secs(crate::constants::SERVER_STARTUP_TIMEOUT_SECS);
    let poll_interval =
        std::time::Duration::from_millis(crate::constants::SERVER_POLL_INTERVAL_MS);
    let start_time = std::time::Instant::now();

    loop {
        if handle.is_finished() {
            anyhow::bail!("metrics server failed to start");
        }
        if state.is_ready.load(Ordering::Relaxed) {
            return Ok(());
        }
        if start_time.elapsed() > startup_timeout {
            anyhow::bail!(
                "metrics server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            );
        }
        tokio::time::sleep(poll_interval).await;
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz_handler(State(app): State<AppState>) -> impl IntoResponse {
    if app.state.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}
