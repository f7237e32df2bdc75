// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes label keys used by the emailer
pub mod labels {
    /// Presence marks a Job as a notification candidate; the value is the mode
    pub const MODE: &str = "k8s-emailer.hpc.nyu.edu/mode";
}

/// Kubernetes annotation keys used by the emailer
pub mod annotations {
    /// Comma-separated list of recipient addresses
    pub const ADDRESSES: &str = "k8s-emailer.hpc.nyu.edu/addresses";
    /// Serialized state as of the last notification that was sent
    pub const LAST_NOTIFIED: &str = "k8s-emailer.hpc.nyu.edu/last-notified";
}

/// Defaults for settings read from the environment
pub mod defaults {
    pub const FULL_SYNC_INTERVAL_SECS: u64 = 120;
    pub const SUBJECT_TEMPLATE: &str = "[{tag}] {status}: {name}";
    pub const TAG: &str = "Kubernetes";
    pub const SMTP_PORT: u16 = 587;
    pub const SMTPS_PORT: u16 = 465;
    pub const SEND_TIMEOUT_SECS: u64 = 30;
    pub const MAX_CONCURRENT_JOBS: usize = 4;
    pub const METRICS_PORT: u16 = 8080;
    /// Consecutive failed listings after which /healthz reports unhealthy
    pub const MAX_LIST_FAILURES: u32 = 10;
}
