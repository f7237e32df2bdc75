// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses and the emailer's collaborators.

use crate::constants::{annotations, labels};
use crate::error::{EmailerError, Result};
use crate::kubernetes::ResourceStore;
use crate::mail::MailSender;
use crate::policy::Notification;
use crate::types::WorkloadResource;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A request seen by the mock service
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let content_type = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                query,
                content_type,
                body,
            });

            let (status, body) = response.unwrap_or_else(|| {
                // Default 404 for unmatched requests
                (404, not_found_json("resource", "unknown"))
            });
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a Job JSON object carrying the emailer's label and annotations
pub fn job_json(
    namespace: &str,
    name: &str,
    mode: Option<&str>,
    addresses: Option<&str>,
    last_notified: Option<&str>,
    status: serde_json::Value,
) -> serde_json::Value {
    let mut job_labels = serde_json::Map::new();
    if let Some(mode) = mode {
        job_labels.insert(labels::MODE.to_string(), mode.into());
    }
    let mut job_annotations = serde_json::Map::new();
    if let Some(addresses) = addresses {
        job_annotations.insert(annotations::ADDRESSES.to_string(), addresses.into());
    }
    if let Some(last_notified) = last_notified {
        job_annotations.insert(annotations::LAST_NOTIFIED.to_string(), last_notified.into());
    }

    serde_json::json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": format!("{}-{}-uid", namespace, name),
            "labels": job_labels,
            "annotations": job_annotations,
        },
        "status": status,
    })
}

/// Create a JobList JSON response
pub fn job_list_json(items: &[serde_json::Value]) -> String {
    serde_json::json!({
        "apiVersion": "batch/v1",
        "kind": "JobList",
        "metadata": {"resourceVersion": "1"},
        "items": items,
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Build a resource snapshot directly, bypassing the Job mapping
pub fn resource(namespace: &str, name: &str, mode: Option<&str>) -> WorkloadResource {
    WorkloadResource {
        namespace: namespace.to_string(),
        name: name.to_string(),
        mode: mode.map(str::to_string),
        recipients: vec!["ops@example.org".to_string()],
        state: Default::default(),
        last_notified: None,
    }
}

fn not_found() -> EmailerError {
    EmailerError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: "not found".to_string(),
        reason: "NotFound".to_string(),
        code: 404,
    }))
}

/// In-memory `ResourceStore` that applies patches to its own snapshots
#[derive(Clone, Default)]
pub struct FakeStore {
    resources: Arc<Mutex<Vec<WorkloadResource>>>,
    patches: Arc<Mutex<Vec<(String, String, String, String)>>>,
    fail_list: Arc<Mutex<bool>>,
    fail_patch_for: Arc<Mutex<HashSet<String>>>,
}

impl FakeStore {
    pub fn new(resources: Vec<WorkloadResource>) -> Self {
        Self {
            resources: Arc::new(Mutex::new(resources)),
            ..Default::default()
        }
    }

    pub fn set_resources(&self, resources: Vec<WorkloadResource>) {
        *self.resources.lock().unwrap() = resources;
    }

    pub fn fail_list(&self, fail: bool) {
        *self.fail_list.lock().unwrap() = fail;
    }

    /// Make patches on `namespace/name` fail
    pub fn fail_patch_for(&self, qualified_name: &str) {
        self.fail_patch_for
            .lock()
            .unwrap()
            .insert(qualified_name.to_string());
    }

    /// `(namespace, name, key, value)` of every successful patch
    pub fn patches(&self) -> Vec<(String, String, String, String)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceStore for FakeStore {
    async fn list(&self, _label_selector: &str) -> Result<Vec<WorkloadResource>> {
        if *self.fail_list.lock().unwrap() {
            return Err(not_found());
        }
        Ok(self.resources.lock().unwrap().clone())
    }

    async fn patch_annotation(&self, namespace: &str, name: &str, key: &str, value: &str) -> Result<()> {
        if self
            .fail_patch_for
            .lock()
            .unwrap()
            .contains(&format!("{}/{}", namespace, name))
        {
            return Err(not_found());
        }

        for resource in self.resources.lock().unwrap().iter_mut() {
            if resource.namespace == namespace && resource.name == name && key == annotations::LAST_NOTIFIED {
                resource.last_notified = Some(value.to_string());
            }
        }
        self.patches.lock().unwrap().push((
            namespace.to_string(),
            name.to_string(),
            key.to_string(),
            value.to_string(),
        ));
        Ok(())
    }
}

/// A mail sent through `FakeMailer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipients: Vec<String>,
    pub notification: Notification,
    pub qualified_name: String,
}

/// In-memory `MailSender` that records sends and can be told to fail or hang
#[derive(Clone, Default)]
pub struct FakeMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
    failing: Arc<Mutex<bool>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Delay every send, to exercise the send timeout
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for FakeMailer {
    async fn send(&self, recipients: &[String], notification: Notification, qualified_name: &str) -> Result<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.failing.lock().unwrap() {
            return Err(EmailerError::MailError("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipients: recipients.to_vec(),
            notification,
            qualified_name: qualified_name.to_string(),
        });
        Ok(())
    }
}
