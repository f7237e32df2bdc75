// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailerError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to send email: {0}")]
    MailError(String),

    #[error("Sending email timed out after {0:?}")]
    MailTimeout(Duration),

    #[error("Failed to encode notification record: {0}")]
    EncodeError(#[from] serde_json::Error),

    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),
}

pub type Result<T> = std::result::Result<T, EmailerError>;
