// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Decides whether a Job is due a notification.

use crate::types::{JobState, NotificationRecord, NotifyMode};
use std::fmt;

/// The single notification a Job can receive in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Failed,
    Succeeded,
    Retried,
}

impl Notification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notification::Failed => "Job failed",
            Notification::Succeeded => "Job succeeded",
            Notification::Retried => "Job was retried",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub notification: Option<Notification>,
    pub malformed_mode: bool,
}

/// Compare the observed state against the last notified one.
///
/// At most one notification is produced; failure beats success beats retry.
pub fn decide(raw_mode: Option<&str>, last: &NotificationRecord, current: &JobState) -> Decision {
    let parsed = NotifyMode::parse(raw_mode);
    let mode = parsed.mode;

    let notification = if current.is_failure && !last.is_failure && mode.notify_on_failure() {
        Some(Notification::Failed)
    } else if current.is_success && !last.is_success && mode.notify_on_success() {
        Some(Notification::Succeeded)
    } else if current.retry_count != 0
        && current.retry_count != last.retry_count
        && mode.notify_on_retry()
    {
        Some(Notification::Retried)
    } else {
        None
    };

    Decision {
        notification,
        malformed_mode: parsed.malformed,
    }
}
