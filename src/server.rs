// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! # HTTP Server
//!
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - 503 once listing Jobs has failed too many cycles in a row
//! - `/readyz` - 200 after the first successful cycle

use crate::metrics::Metrics;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Health of the sync loop, shared with the probe endpoints
pub struct ServerState {
    ready: AtomicBool,
    consecutive_list_failures: AtomicU32,
    max_list_failures: u32,
}

impl ServerState {
    pub fn new(max_list_failures: u32) -> Self {
        Self {
            ready: AtomicBool::new(false),
            consecutive_list_failures: AtomicU32::new(0),
            max_list_failures,
        }
    }

    pub fn record_cycle_success(&self) {
        self.consecutive_list_failures.store(0, Ordering::Relaxed);
        self.ready.store(true, Ordering::Relaxed);
    }

    /// Returns the number of consecutive failures including this one
    pub fn record_list_failure(&self) -> u32 {
        self.consecutive_list_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    pub fn is_healthy(&self) -> bool {
        self.max_list_failures == 0
            || self.consecutive_list_failures.load(Ordering::Relaxed) < self.max_list_failures
    }
}

#[derive(Clone)]
struct AppState {
    health: Arc<ServerState>,
    metrics: Arc<Metrics>,
}

fn router(health: Arc<ServerState>, metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .with_state(AppState { health, metrics })
}

pub async fn start_server(port: u16, health: Arc<ServerState>, metrics: Arc<Metrics>) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router(health, metrics)).await?;

    Ok(())
}

/// Run the server on its own task. A startup failure is logged, since the
/// sync loop keeps going without the endpoints.
pub fn spawn_server(port: u16, health: Arc<ServerState>, metrics: Arc<Metrics>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = start_server(port, health, metrics).await {
            error!("HTTP server error on port {}: {}", port, e);
        }
    })
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        ),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
