// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// SMTP settings for the mail transport
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (SMTPS) instead of plain SMTP
    pub ssl: bool,
    pub from_address: String,
    pub credentials: Option<(String, String)>,
}

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Time between two full syncs
    pub sync_interval: Duration,
    pub smtp: SmtpConfig,
    /// Tag substituted for `{tag}` in the subject
    pub email_tag: String,
    pub subject_template: String,
    pub send_timeout: Duration,
    pub max_concurrent_jobs: usize,
    pub metrics_port: u16,
    pub max_list_failures: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sync_interval_secs: u64 = parse_or(&lookup, "FULL_SYNC_INTERVAL", defaults::FULL_SYNC_INTERVAL_SECS)?;
        if sync_interval_secs == 0 {
            bail!("FULL_SYNC_INTERVAL must be a positive number of seconds");
        }

        let ssl = lookup("EMAIL_SSL").is_some_and(|v| is_truthy(&v));
        let default_port = if ssl { defaults::SMTPS_PORT } else { defaults::SMTP_PORT };

        let host = lookup("EMAIL_HOST")
            .filter(|v| !v.is_empty())
            .context("EMAIL_HOST environment variable not set")?;
        let from_address = lookup("EMAIL_FROM")
            .filter(|v| !v.is_empty())
            .context("EMAIL_FROM environment variable not set")?;

        let credentials = match (lookup("EMAIL_USERNAME"), lookup("EMAIL_PASSWORD")) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            _ => bail!("EMAIL_USERNAME and EMAIL_PASSWORD must be set together"),
        };

        let send_timeout_secs: u64 = parse_or(&lookup, "EMAIL_SEND_TIMEOUT_SECS", defaults::SEND_TIMEOUT_SECS)?;
        if send_timeout_secs == 0 {
            bail!("EMAIL_SEND_TIMEOUT_SECS must be a positive number of seconds");
        }

        let max_concurrent_jobs: usize = parse_or(&lookup, "MAX_CONCURRENT_JOBS", defaults::MAX_CONCURRENT_JOBS)?;

        Ok(Config {
            sync_interval: Duration::from_secs(sync_interval_secs),
            smtp: SmtpConfig {
                host,
                port: parse_or(&lookup, "EMAIL_PORT", default_port)?,
                ssl,
                from_address,
                credentials,
            },
            email_tag: lookup("EMAIL_TAG").unwrap_or_else(|| defaults::TAG.to_string()),
            subject_template: lookup("EMAIL_SUBJECT_TEMPLATE")
                .unwrap_or_else(|| defaults::SUBJECT_TEMPLATE.to_string()),
            send_timeout: Duration::from_secs(send_timeout_secs),
            max_concurrent_jobs: max_concurrent_jobs.max(1),
            metrics_port: parse_or(&lookup, "METRICS_PORT", defaults::METRICS_PORT)?,
            max_list_failures: parse_or(&lookup, "MAX_LIST_FAILURES", defaults::MAX_LIST_FAILURES)?,
        })
    }
}

/// `EMAIL_SSL` is on for anything but the usual "off" spellings
fn is_truthy(value: &str) -> bool {
    !matches!(value, "0" | "no" | "false" | "off")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}
