// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The poll loop driving full syncs.

pub mod manager;

pub use manager::{SyncManager, SyncManagerHandle};
