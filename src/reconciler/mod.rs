// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Full-sync reconciler: decides, sends and records notifications for every labeled Job.

pub mod report;

pub use report::{CycleReport, NamespaceCounts, ResourceOutcome};

use crate::constants::{annotations, labels};
use crate::error::Result;
use crate::kubernetes::ResourceStore;
use crate::mail::{send_with_timeout, MailSender};
use crate::metrics::Metrics;
use crate::policy::decide;
use crate::types::{NotificationRecord, WorkloadResource};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Tunables for a reconcile cycle
#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    /// Resources processed at the same time
    pub concurrency: usize,
    pub send_timeout: Duration,
}

pub struct Reconciler {
    store: Arc<dyn ResourceStore>,
    mailer: Arc<dyn MailSender>,
    metrics: Arc<Metrics>,
    settings: ReconcilerSettings,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        mailer: Arc<dyn MailSender>,
        metrics: Arc<Metrics>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            store,
            mailer,
            metrics,
            settings,
        }
    }

    /// Run one full cycle. Only a failure to list resources is returned;
    /// everything that goes wrong for a single resource stays with it.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let resources = self.store.list(labels::MODE).await?;
        let total = resources.len();
        debug!("Found {} labeled jobs", total);

        // Each item owns its resource so the cycle future stays Send
        let outcomes: Vec<ResourceOutcome> = stream::iter(resources)
            .map(|resource| async move { self.reconcile(&resource).await })
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut report = CycleReport::default();
        for outcome in outcomes {
            report.record(outcome);
        }

        self.metrics.publish(&report);

        info!(
            "Cycle complete: {} jobs, {} notifications, {} send errors",
            total,
            report.notifications,
            report.send_errors
        );
        Ok(report)
    }

    #[instrument(skip(self, resource), fields(job = %resource.qualified_name()))]
    async fn reconcile(&self, resource: &WorkloadResource) -> ResourceOutcome {
        let last = NotificationRecord::decode_or_default(resource.last_notified.as_deref());
        let decision = decide(resource.mode.as_deref(), &last, &resource.state);
        let mut outcome = ResourceOutcome::new(&resource.namespace, decision.malformed_mode);

        if decision.malformed_mode {
            warn!(
                "Unknown mode {:?} on {}, notifying on everything",
                resource.mode,
                resource.qualified_name()
            );
        }

        let Some(notification) = decision.notification else {
            return outcome;
        };

        let qualified_name = resource.qualified_name();
        info!(
            "Sending email to {} addresses: {} {}",
            resource.recipients.len(),
            notification,
            qualified_name
        );

        if let Err(e) = send_with_timeout(
            self.mailer.as_ref(),
            self.settings.send_timeout,
            &resource.recipients,
            notification,
            &qualified_name,
        )
        .await
        {
            // State stays untouched so the next cycle tries again
            error!("Error sending emails for {}: {}", qualified_name, e);
            outcome.send_errors += 1;
            return outcome;
        }
        outcome.emails_sent = resource.recipients.len() as u64;

        if let Err(e) = self.record_sent(resource).await {
            error!(
                "Sent emails for {} but failed to record it, they will be sent again: {}",
                qualified_name, e
            );
            outcome.send_errors += 1;
            return outcome;
        }

        outcome.notified = Some(notification);
        outcome
    }

    async fn record_sent(&self, resource: &WorkloadResource) -> Result<()> {
        let value = NotificationRecord::from(resource.state).encode()?;
        self.store
            .patch_annotation(
                &resource.namespace,
                &resource.name,
                annotations::LAST_NOTIFIED,
                &value,
            )
            .await
    }
}
