// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! # Metrics
//!
//! Prometheus metrics for the emailer.
//!
//! - `bad_annotations{namespace}` - Jobs whose mode label is not a known mode
//! - `annotated{namespace}` - Jobs found carrying the mode label
//! - `emails{namespace}` - Emails sent (one per recipient)
//! - `email_errors` - Failed sends, and failed state updates after a send
//!
//! Gauges are replaced wholesale on every cycle so namespaces that disappear
//! drop out instead of keeping their last value.

use crate::reconciler::CycleReport;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    bad_annotations: IntGaugeVec,
    annotated: IntGaugeVec,
    emails: IntCounterVec,
    email_errors: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let bad_annotations = IntGaugeVec::new(
            Opts::new("bad_annotations", "Number of jobs with incorrect annotations/labels"),
            &["namespace"],
        )?;
        let annotated = IntGaugeVec::new(
            Opts::new("annotated", "Number of jobs found with email annotations"),
            &["namespace"],
        )?;
        let emails = IntCounterVec::new(Opts::new("emails", "Number of emails sent"), &["namespace"])?;
        let email_errors = IntCounter::new("email_errors", "Number of errors sending emails")?;

        registry.register(Box::new(bad_annotations.clone()))?;
        registry.register(Box::new(annotated.clone()))?;
        registry.register(Box::new(emails.clone()))?;
        registry.register(Box::new(email_errors.clone()))?;

        Ok(Self {
            registry,
            bad_annotations,
            annotated,
            emails,
            email_errors,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Flush a finished cycle. Gauges are reset first; counters accumulate.
    pub fn publish(&self, report: &CycleReport) {
        self.annotated.reset();
        self.bad_annotations.reset();

        for (namespace, counts) in &report.namespaces {
            self.annotated.with_label_values(&[namespace.as_str()]).set(counts.annotated);
            self.bad_annotations
                .with_label_values(&[namespace.as_str()])
                .set(counts.bad_annotations);
            // Keeps the series present so rate() has no gaps
            self.emails.with_label_values(&[namespace.as_str()]).inc_by(counts.emails);
        }

        self.email_errors.inc_by(report.send_errors);
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn sample(&self, name: &str, namespace: &str) -> Option<f64> {
        let prefix = format!("{}{{namespace=\"{}\"}} ", name, namespace);
        self.render()
            .ok()?
            .lines()
            .find_map(|line| line.strip_prefix(&prefix)?.trim().parse().ok())
    }

    #[cfg(test)]
    pub(crate) fn email_errors(&self) -> u64 {
        self.email_errors.get()
    }
}
