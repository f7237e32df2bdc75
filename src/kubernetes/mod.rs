// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes access for the emailer: listing labeled Jobs and persisting state on them.

pub mod jobs;

pub use jobs::{JobStore, ResourceStore};
