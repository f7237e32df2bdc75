// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Email delivery for Job notifications.

pub mod smtp;

pub use smtp::SmtpMailer;

use crate::error::{EmailerError, Result};
use crate::policy::Notification;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

/// Delivers one notification to a list of recipients
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, recipients: &[String], notification: Notification, qualified_name: &str) -> Result<()>;
}

/// Run a send, failing it if it does not finish within `limit`
pub async fn send_with_timeout(
    mailer: &dyn MailSender,
    limit: Duration,
    recipients: &[String],
    notification: Notification,
    qualified_name: &str,
) -> Result<()> {
    timeout(limit, mailer.send(recipients, notification, qualified_name))
        .await
        .map_err(|_| EmailerError::MailTimeout(limit))?
}

/// Subject and body of a notification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Subject template with `{tag}`, `{status}` and `{name}` placeholders
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    subject_template: String,
    tag: String,
}

impl MessageTemplate {
    pub fn new(subject_template: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            subject_template: subject_template.into(),
            tag: tag.into(),
        }
    }

    pub fn render(&self, notification: Notification, qualified_name: &str) -> RenderedMessage {
        let status = notification.as_str();
        let subject = self
            .subject_template
            .replace("{tag}", &self.tag)
            .replace("{status}", status)
            .replace("{name}", qualified_name);

        RenderedMessage {
            subject,
            body: format!("{}: {}", status, qualified_name),
        }
    }
}
