// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{annotations, labels};
use k8s_openapi::api::batch::v1::Job;
use kube::ResourceExt;
use std::collections::BTreeSet;

/// Completion state of a Job as observed this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobState {
    pub is_failure: bool,
    pub is_success: bool,
    pub retry_count: u32,
}

impl JobState {
    /// Derive the state from a Job's status. A `Failed=True` condition
    /// wins over a completion time.
    pub fn from_job(job: &Job) -> Self {
        let Some(status) = job.status.as_ref() else {
            return Self::default();
        };

        let is_failure = status.conditions.as_ref().is_some_and(|conditions| {
            conditions.iter().any(|c| {
                c.type_.eq_ignore_ascii_case("failed") && c.status.eq_ignore_ascii_case("true")
            })
        });
        let is_success = !is_failure && status.completion_time.is_some();
        let retry_count = status
            .failed
            .and_then(|failed| u32::try_from(failed).ok())
            .unwrap_or(0);

        Self {
            is_failure,
            is_success,
            retry_count,
        }
    }
}

/// Snapshot of a labeled Job, holding only what notification needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadResource {
    pub namespace: String,
    pub name: String,
    /// Raw value of the mode label
    pub mode: Option<String>,
    /// Sorted, de-duplicated recipient addresses
    pub recipients: Vec<String>,
    pub state: JobState,
    /// Raw value of the last-notified annotation
    pub last_notified: Option<String>,
}

impl WorkloadResource {
    pub fn from_job(job: &Job) -> Self {
        let job_annotations = job.annotations();

        Self {
            namespace: job.namespace().unwrap_or_default(),
            name: job.name_any(),
            mode: job.labels().get(labels::MODE).cloned(),
            recipients: job_annotations
                .get(annotations::ADDRESSES)
                .map(|raw| parse_recipients(raw))
                .unwrap_or_default(),
            state: JobState::from_job(job),
            last_notified: job_annotations.get(annotations::LAST_NOTIFIED).cloned(),
        }
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Split a comma-separated address list, dropping blanks and duplicates
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
