// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-cycle aggregation of resource outcomes

use crate::policy::Notification;
use std::collections::BTreeMap;

/// What happened to a single resource during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub namespace: String,
    pub malformed_mode: bool,
    /// Notification that was sent and recorded, if any
    pub notified: Option<Notification>,
    /// Number of recipients mailed
    pub emails_sent: u64,
    /// Failed sends plus failed patches after a send
    pub send_errors: u64,
}

impl ResourceOutcome {
    pub fn new(namespace: &str, malformed_mode: bool) -> Self {
        Self {
            namespace: namespace.to_string(),
            malformed_mode,
            notified: None,
            emails_sent: 0,
            send_errors: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceCounts {
    pub annotated: i64,
    pub bad_annotations: i64,
    pub emails: u64,
}

/// Counters for one cycle, built from scratch every time and flushed once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub namespaces: BTreeMap<String, NamespaceCounts>,
    pub send_errors: u64,
    pub notifications: usize,
}

impl CycleReport {
    pub fn record(&mut self, outcome: ResourceOutcome) {
        let counts = self.namespaces.entry(outcome.namespace).or_default();
        counts.annotated += 1;
        if outcome.malformed_mode {
            counts.bad_annotations += 1;
        }
        counts.emails += outcome.emails_sent;

        self.send_errors += outcome.send_errors;
        if outcome.notified.is_some() {
            self.notifications += 1;
        }
    }

    pub fn annotated(&self, namespace: &str) -> i64 {
        self.namespaces.get(namespace).map_or(0, |c| c.annotated)
    }

    pub fn bad_annotations(&self, namespace: &str) -> i64 {
        self.namespaces.get(namespace).map_or(0, |c| c.bad_annotations)
    }

    pub fn emails(&self, namespace: &str) -> u64 {
        self.namespaces.get(namespace).map_or(0, |c| c.emails)
    }
}
