// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Runs a full sync every interval until asked to stop.

use crate::reconciler::Reconciler;
use crate::server::ServerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Drives the reconciler: one cycle, then sleep, forever.
/// A cycle in progress always runs to completion before shutdown.
pub struct SyncManager {
    reconciler: Reconciler,
    interval: Duration,
    state: Arc<ServerState>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Handle to stop the SyncManager
#[derive(Clone)]
pub struct SyncManagerHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl SyncManagerHandle {
    /// Ask the loop to exit once the current cycle is done
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            warn!("SyncManager already stopped");
        }
    }
}

impl SyncManager {
    pub fn new(reconciler: Reconciler, interval: Duration, state: Arc<ServerState>) -> (Self, SyncManagerHandle) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let manager = Self {
            reconciler,
            interval,
            state,
            shutdown_rx,
        };

        let handle = SyncManagerHandle {
            shutdown_tx: Arc::new(shutdown_tx),
        };
        (manager, handle)
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("SyncManager started, syncing every {:?}", self.interval);

        loop {
            self.sync_once().await;

            if *self.shutdown_rx.borrow() {
                break;
            }

            let handles_dropped = tokio::select! {
                _ = tokio::time::sleep(self.interval) => false,
                changed = self.shutdown_rx.changed() => changed.is_err(),
            };
            if handles_dropped || *self.shutdown_rx.borrow() {
                break;
            }
        }

        info!("SyncManager stopped");
        Ok(())
    }

    async fn sync_once(&self) {
        match self.reconciler.run_cycle().await {
            Ok(_) => self.state.record_cycle_success(),
            Err(e) => {
                let failures = self.state.record_list_failure();
                error!(
                    "Failed to list jobs ({} consecutive failures), retrying in {:?}: {}",
                    failures, self.interval, e
                );
            }
        }
    }
}
