// Copyright 2025 Cowboy AI, LLC.

//! Cache abstraction for the read path
//!
//! Every read handler goes through this seam: point lookups are cached under
//! `"{Entity}:{id}"`, paged lists under `"{Entity}:list:…"`, and the write
//! pipeline invalidates by key or by prefix. Entries carry an absolute TTL as
//! a backstop; invalidation on write is the primary consistency mechanism.
//!
//! Semantics are last-writer-wins on `set` and idempotent `remove`; the
//! cache is always re-derivable from the source of truth.

use crate::errors::DomainResult;
use async_trait::async_trait;
use lru::LruCache;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Async cache keyed by string, storing JSON values
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a cached value, if present and not expired
    async fn get(&self, key: &str) -> DomainResult<Option<serde_json::Value>>;

    /// Store a value under a key with an absolute TTL
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> DomainResult<()>;

    /// Remove a single key; removing an absent key is a no-op
    async fn remove(&self, key: &str) -> DomainResult<()>;

    /// Remove every key starting with the given prefix
    async fn remove_by_prefix(&self, prefix: &str) -> DomainResult<()>;
}

/// Cache key for a point lookup: `"{Entity}:{id}"`
pub fn entity_key(entity: &str, id: impl Display) -> String {
    format!("{entity}:{id}")
}

/// Cache key prefix shared by every paged list of an entity type:
/// `"{Entity}:list:"`
pub fn list_prefix(entity: &str) -> String {
    format!("{entity}:list:")
}

/// Configuration for the in-memory cache
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct CacheConfig {
    /// Maximum number of entries held before LRU eviction
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 10_000 }
    }
}

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// In-memory LRU cache with per-entry absolute expiration
///
/// The reference [`Cache`] implementation for single-process deployments and
/// tests. Expired entries are treated as misses and dropped on access.
pub struct InMemoryCache {
    entries: RwLock<LruCache<String, CacheEntry>>,
}

impl InMemoryCache {
    /// Create a cache from config
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> DomainResult<Option<serde_json::Value>> {
        let mut entries = self.entries.write().await;
        let hit = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };
        if hit.is_none() {
            // Expired entries read as misses and are dropped eagerly
            entries.pop(key);
        }
        Ok(hit)
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> DomainResult<()> {
        let mut entries = self.entries.write().await;
        entries.put(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        let mut entries = self.entries.write().await;
        entries.pop(key);
        Ok(())
    }

    async fn remove_by_prefix(&self, prefix: &str) -> DomainResult<()> {
        let mut entries = self.entries.write().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        debug!(prefix, removed = stale.len(), "cache prefix invalidation");
        for key in stale {
            entries.pop(&key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_conventions() {
        assert_eq!(entity_key("Account", "abc"), "Account:abc");
        assert_eq!(list_prefix("Account"), "Account:list:");

        // A point-lookup key never collides with the list namespace
        assert!(!entity_key("Account", "abc").starts_with(&list_prefix("Account")));
    }

    #[test]
    fn set_get_remove_roundtrip() {
        tokio_test::block_on(async {
            let cache = InMemoryCache::default();
            let ttl = Duration::from_secs(60);

            cache.set("Account:1", json!({"name": "Checking"}), ttl).await.unwrap();
            assert_eq!(
                cache.get("Account:1").await.unwrap(),
                Some(json!({"name": "Checking"}))
            );

            cache.remove("Account:1").await.unwrap();
            assert_eq!(cache.get("Account:1").await.unwrap(), None);

            // Removing again is a no-op
            cache.remove("Account:1").await.unwrap();
        });
    }

    #[test]
    fn expired_entries_read_as_misses() {
        tokio_test::block_on(async {
            let cache = InMemoryCache::default();

            cache.set("k", json!(1), Duration::from_millis(5)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;

            assert_eq!(cache.get("k").await.unwrap(), None);
        });
    }

    #[test]
    fn prefix_invalidation_spares_other_namespaces() {
        tokio_test::block_on(async {
            let cache = InMemoryCache::default();
            let ttl = Duration::from_secs(60);

            cache.set("Expense:list:1:10", json!([1]), ttl).await.unwrap();
            cache.set("Expense:list:2:10", json!([2]), ttl).await.unwrap();
            cache.set("Expense:abc", json!({"id": "abc"}), ttl).await.unwrap();
            cache.set("Income:list:1:10", json!([3]), ttl).await.unwrap();

            cache.remove_by_prefix("Expense:list:").await.unwrap();

            assert_eq!(cache.get("Expense:list:1:10").await.unwrap(), None);
            assert_eq!(cache.get("Expense:list:2:10").await.unwrap(), None);
            assert!(cache.get("Expense:abc").await.unwrap().is_some());
            assert!(cache.get("Income:list:1:10").await.unwrap().is_some());
        });
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        tokio_test::block_on(async {
            let cache = InMemoryCache::new(CacheConfig { capacity: 2 });
            let ttl = Duration::from_secs(60);

            cache.set("a", json!(1), ttl).await.unwrap();
            cache.set("b", json!(2), ttl).await.unwrap();
            cache.get("a").await.unwrap();
            cache.set("c", json!(3), ttl).await.unwrap();

            // "b" was the least recently used entry
            assert_eq!(cache.get("b").await.unwrap(), None);
            assert!(cache.get("a").await.unwrap().is_some());
            assert!(cache.get("c").await.unwrap().is_some());
        });
    }
}
