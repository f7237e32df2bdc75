// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! SMTP delivery through lettre

use super::{MailSender, MessageTemplate};
use crate::config::Config;
use crate::error::{EmailerError, Result};
use crate::policy::Notification;
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

/// Sends one message per recipient over a pooled SMTP transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    template: MessageTemplate,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self> {
        let smtp = &config.smtp;

        let builder = if smtp.ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
                .map_err(|e| EmailerError::MailError(format!("Invalid SMTP relay {}: {}", smtp.host, e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
        };

        let mut builder = builder.port(smtp.port);
        if let Some((user, password)) = &smtp.credentials {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        let from = smtp.from_address.parse::<Mailbox>().map_err(|e| {
            EmailerError::MailError(format!("Invalid sender address {}: {}", smtp.from_address, e))
        })?;

        Ok(Self {
            transport: builder.build(),
            from,
            template: MessageTemplate::new(&config.subject_template, &config.email_tag),
        })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| EmailerError::InvalidAnnotation(format!("Invalid recipient {}: {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailerError::MailError(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    #[instrument(skip(self, recipients), fields(recipients = recipients.len()))]
    async fn send(&self, recipients: &[String], notification: Notification, qualified_name: &str) -> Result<()> {
        let rendered = self.template.render(notification, qualified_name);

        // Every address must parse before anything goes out
        let messages = recipients
            .iter()
            .map(|address| {
                self.build_message(address, &rendered.subject, &rendered.body)
                    .map(|message| (address, message))
            })
            .collect::<Result<Vec<_>>>()?;

        for (address, message) in messages {
            self.transport
                .send(message)
                .await
                .map_err(|e| EmailerError::MailError(format!("Failed to send to {}: {}", address, e)))?;
            debug!("Sent '{}' to {}", rendered.subject, address);
        }

        Ok(())
    }
}
