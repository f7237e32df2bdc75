// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use k8s_emailer::config::Config;
use k8s_emailer::kubernetes::JobStore;
use k8s_emailer::mail::SmtpMailer;
use k8s_emailer::metrics::Metrics;
use k8s_emailer::reconciler::{Reconciler, ReconcilerSettings};
use k8s_emailer::server::{spawn_server, ServerState};
use k8s_emailer::sync::{SyncManager, SyncManagerHandle};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting k8s-emailer {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: interval={:?}, smtp={}:{}, ssl={}",
        config.sync_interval, config.smtp.host, config.smtp.port, config.smtp.ssl
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let metrics = Arc::new(Metrics::new()?);
    let health = Arc::new(ServerState::new(config.max_list_failures));

    let reconciler = Reconciler::new(
        Arc::new(JobStore::new(client)),
        Arc::new(SmtpMailer::from_config(&config)?),
        metrics.clone(),
        ReconcilerSettings {
            concurrency: config.max_concurrent_jobs,
            send_timeout: config.send_timeout,
        },
    );

    let (sync_manager, sync_handle) = SyncManager::new(reconciler, config.sync_interval, health.clone());

    let server = spawn_server(config.metrics_port, health, metrics);
    tokio::spawn(shutdown_on_signal(sync_handle));

    sync_manager.run().await?;

    server.abort();
    info!("Shut down cleanly");
    Ok(())
}

/// Stop the sync loop on SIGINT or SIGTERM
async fn shutdown_on_signal(handle: SyncManagerHandle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown requested, finishing the current cycle");
    handle.shutdown();
}
