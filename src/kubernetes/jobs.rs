// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Job listing and annotation patching

use crate::error::Result;
use crate::types::WorkloadResource;
use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use kube::{
    api::{ListParams, Patch, PatchParams},
    Api, Client,
};
use serde_json::json;
use tracing::{debug, instrument};

/// Where candidate Jobs come from and where notification state goes back to
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List every resource carrying the selector label, across namespaces
    async fn list(&self, label_selector: &str) -> Result<Vec<WorkloadResource>>;

    /// Set a single annotation, leaving every other field untouched
    async fn patch_annotation(&self, namespace: &str, name: &str, key: &str, value: &str) -> Result<()>;
}

/// `ResourceStore` backed by `batch/v1` Jobs
#[derive(Clone)]
pub struct JobStore {
    client: Client,
}

impl JobStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceStore for JobStore {
    #[instrument(skip(self))]
    async fn list(&self, label_selector: &str) -> Result<Vec<WorkloadResource>> {
        let jobs: Api<Job> = Api::all(self.client.clone());
        let job_list = jobs.list(&ListParams::default().labels(label_selector)).await?;

        debug!("Listed {} labeled jobs", job_list.items.len());

        Ok(job_list.items.iter().map(WorkloadResource::from_job).collect())
    }

    #[instrument(skip(self, value))]
    async fn patch_annotation(&self, namespace: &str, name: &str, key: &str, value: &str) -> Result<()> {
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let patch = json!({
            "metadata": {
                "annotations": {
                    (key): value,
                },
            },
        });

        jobs.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        debug!("Patched annotation {} on {}/{}", key, namespace, name);
        Ok(())
    }
}
