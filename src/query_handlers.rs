// Copyright 2025 Cowboy AI, LLC.

//! Generic query pipeline
//!
//! The read side of CQRS: cache-aside point lookups and paged lists over
//! DTO projections. Cache entries expire on a fixed TTL as a backstop; the
//! command pipeline's invalidation-on-write is the primary consistency
//! mechanism, so the worst case is one stale read window of at most the TTL
//! when an invalidation is missed.

use crate::cache::{entity_key, list_prefix, Cache};
use crate::cqrs::{GetById, QueryEnvelope};
use crate::entity::EntityName;
use crate::errors::{DomainError, DomainResult};
use crate::read_model::{ListProjection, Page, PageRequest, ReadModelStorage};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Tuning knobs for the query pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct QueryConfig {
    /// Absolute cache expiration, in seconds
    pub ttl_secs: u64,
    /// Upper bound for the page size of list requests
    pub max_page_size: u32,
    /// Whether paged lists are cached at all
    pub cache_lists: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            max_page_size: 100,
            cache_lists: true,
        }
    }
}

impl QueryConfig {
    fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Cache key for one paged list: the full parameter tuple under the entity's
/// list prefix, so any create/update/delete can invalidate wholesale by
/// prefix
fn list_key(entity: &str, request: &PageRequest) -> String {
    let search = request
        .search
        .as_deref()
        .unwrap_or("")
        .to_lowercase()
        .replace(':', "_");
    format!(
        "{}{}:{}:{}:{}:{}:{}",
        list_prefix(entity),
        request.page,
        request.page_size,
        search,
        request.sort_by.as_deref().unwrap_or(""),
        request
            .sort_direction
            .map(|d| d.to_string())
            .unwrap_or_default(),
        request
            .owner_id
            .map(|o| o.to_string())
            .unwrap_or_default(),
    )
}

/// Generic query handler for one view type
pub struct QueryPipeline<D> {
    read_model: Arc<dyn ReadModelStorage<D>>,
    cache: Arc<dyn Cache>,
    config: QueryConfig,
}

impl<D> QueryPipeline<D>
where
    D: EntityName + ListProjection + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Assemble a pipeline with default config
    pub fn new(read_model: Arc<dyn ReadModelStorage<D>>, cache: Arc<dyn Cache>) -> Self {
        Self::with_config(read_model, cache, QueryConfig::default())
    }

    /// Assemble a pipeline with explicit config
    pub fn with_config(
        read_model: Arc<dyn ReadModelStorage<D>>,
        cache: Arc<dyn Cache>,
        config: QueryConfig,
    ) -> Self {
        Self {
            read_model,
            cache,
            config,
        }
    }

    /// Cache-aside point lookup
    ///
    /// Hit: the cached view comes back without touching the repository.
    /// Miss: the view is fetched, cached under `"{Entity}:{id}"` with the
    /// configured TTL, then returned. Absent views are `NotFound`.
    pub async fn get_by_id(&self, envelope: QueryEnvelope<GetById>) -> DomainResult<D> {
        let id = envelope.query.id;
        let key = entity_key(D::NAME, id);

        if let Some(cached) = self.cache.get(&key).await? {
            debug!(query_id = %envelope.id, %key, "cache hit");
            return Ok(serde_json::from_value(cached)?);
        }

        debug!(query_id = %envelope.id, %key, "cache miss");
        let view = self
            .read_model
            .get_dto(id)
            .await?
            .ok_or_else(|| DomainError::not_found(D::NAME, id))?;

        self.cache
            .set(&key, serde_json::to_value(&view)?, self.config.ttl())
            .await?;
        Ok(view)
    }

    /// Cache-aside paged list
    ///
    /// The request is normalized (page ≥ 1, size within bounds) before it is
    /// used for the cache key or the query, so equivalent requests share an
    /// entry.
    pub async fn list(&self, envelope: QueryEnvelope<PageRequest>) -> DomainResult<Page<D>> {
        let request = envelope.query.clone().normalized(self.config.max_page_size);
        let key = list_key(D::NAME, &request);

        if self.config.cache_lists {
            if let Some(cached) = self.cache.get(&key).await? {
                debug!(query_id = %envelope.id, %key, "cache hit");
                return Ok(serde_json::from_value(cached)?);
            }
        }

        debug!(query_id = %envelope.id, %key, "cache miss");
        let page = self.read_model.list(&request).await?;

        if self.config.cache_lists {
            self.cache
                .set(&key, serde_json::to_value(&page)?, self.config.ttl())
                .await?;
        }
        Ok(page)
    }
}
