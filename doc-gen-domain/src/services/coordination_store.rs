// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Ephemeral coordination store port (spec §5): worker liveness keys and
//! the TTL'd named lock that serialises stuck-job recovery across workers.
//! Production deployments back this with Redis; the in-crate default is a
//! single-process, `tokio::sync::Mutex`-backed implementation used for
//! tests and standalone runs.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait CoordinationStore: Send + Sync {
    /// Refreshes a liveness key with the given TTL (heartbeat task, spec
    /// §4.2 — TTL is conventionally 2× the heartbeat interval).
    async fn heartbeat(&self, worker_id: &str, ttl: Duration);

    /// Attempts to acquire a named lock, returning an opaque token on
    /// success. Must be released only by the acquiring holder — callers
    /// pass the token back to `release` (spec §5: "Locks must be released
    /// only by the acquiring worker, token-checked via atomic
    /// compare-and-delete").
    async fn try_acquire_lock(&self, name: &str, ttl: Duration) -> Option<String>;

    async fn release_lock(&self, name: &str, token: &str) -> bool;
}
