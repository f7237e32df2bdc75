// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The last-notified record stored in a Job annotation.
//!
//! Wire format is compact JSON with a fixed key order:
//! `{"is_failure":false,"is_success":true,"retries":0,"v":1}`.
//! Records written before the `v` key existed decode as version 1.

use super::job::JobState;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

const RECORD_VERSION: u32 = 1;

/// Job state as of the last notification that was actually sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationRecord {
    pub is_failure: bool,
    pub is_success: bool,
    pub retry_count: u32,
}

#[derive(Serialize, Deserialize)]
struct WireRecord {
    #[serde(default)]
    is_failure: bool,
    #[serde(default)]
    is_success: bool,
    #[serde(default)]
    retries: u32,
    #[serde(default = "legacy_version")]
    v: u32,
}

fn legacy_version() -> u32 {
    RECORD_VERSION
}

impl NotificationRecord {
    pub fn encode(&self) -> Result<String> {
        let wire = WireRecord {
            is_failure: self.is_failure,
            is_success: self.is_success,
            retries: self.retry_count,
            v: RECORD_VERSION,
        };
        Ok(serde_json::to_string(&wire)?)
    }

    /// Decode a stored record. Absent, empty, unparsable or
    /// unknown-version input yields the zero record; errors never escape.
    pub fn decode_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<WireRecord>(raw) {
            Ok(wire) if wire.v == RECORD_VERSION => Self {
                is_failure: wire.is_failure,
                is_success: wire.is_success,
                retry_count: wire.retries,
            },
            Ok(wire) => {
                debug!("Ignoring notification record with unknown version {}", wire.v);
                Self::default()
            }
            Err(e) => {
                debug!("Ignoring unparsable notification record {:?}: {}", raw, e);
                Self::default()
            }
        }
    }
}

impl From<JobState> for NotificationRecord {
    fn from(state: JobState) -> Self {
        Self {
            is_failure: state.is_failure,
            is_success: state.is_success,
            retry_count: state.retry_count,
        }
    }
}
