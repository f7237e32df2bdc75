// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed views of watched Jobs and of the state persisted on them.

pub mod job;
pub mod mode;
pub mod record;

pub use job::{parse_recipients, JobState, WorkloadResource};
pub use mode::{NotifyMode, ParsedMode};
pub use record::NotificationRecord;
