// /////////////////////////////////////////////////////////////////////////////
// Document Generation Platform
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Single-process `CoordinationStore`, backed by a `tokio::sync::Mutex`-
//! guarded map. Standing in for Redis in tests and standalone runs (spec
//! §5): liveness keys and the recovery named lock share one table, each
//! entry carrying its own expiry and — for locks — an owning token checked
//! on release.

use async_trait::async_trait;
use doc_gen_domain::services::CoordinationStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

struct Entry {
    expires_at: Instant,
    token: Option<String>,
}

#[derive(Default)]
pub struct InMemoryCoordinationStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCoordinationStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn is_live(entries: &HashMap<String, Entry>, key: &str) -> bool {
        entries.get(key).map(|e| e.expires_at > Instant::now()).unwrap_or(false)
    }
}

#[async_trait]
impl CoordinationStore for InMemoryCoordinationStore {
    async fn heartbeat(&self, worker_id: &str, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            format!("liveness:{worker_id}"),
            Entry {
                expires_at: Instant::now() + ttl,
                token: None,
            },
        );
    }

    async fn try_acquire_lock(&self, name: &str, ttl: Duration) -> Option<String> {
        let key = format!("lock:{name}");
        let mut entries = self.entries.lock().await;
        if Self::is_live(&entries, &key) {
            return None;
        }
        let token = Uuid::new_v4().to_string();
        entries.insert(
            key,
            Entry {
                expires_at: Instant::now() + ttl,
                token: Some(token.clone()),
            },
        );
        Some(token)
    }

    async fn release_lock(&self, name: &str, token: &str) -> bool {
        let key = format!("lock:{name}");
        let mut entries = self.entries.lock().await;
        match entries.get(&key) {
            Some(entry) if entry.token.as_deref() == Some(token) => {
                entries.remove(&key);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lock_is_exclusive_until_released() {
        let store = InMemoryCoordinationStore::new();
        let token = store.try_acquire_lock("recovery", Duration::from_secs(60)).await;
        assert!(token.is_some());
        assert!(store.try_acquire_lock("recovery", Duration::from_secs(60)).await.is_none());
        assert!(store.release_lock("recovery", &token.unwrap()).await);
        assert!(store.try_acquire_lock("recovery", Duration::from_secs(60)).await.is_some());
    }

    #[tokio::test]
    async fn release_with_wrong_token_fails() {
        let store = InMemoryCoordinationStore::new();
        let token = store.try_acquire_lock("recovery", Duration::from_secs(60)).await.unwrap();
        assert!(!store.release_lock("recovery", "not-the-token").await);
        assert!(store.release_lock("recovery", &token).await);
    }
}
