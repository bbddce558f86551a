// Copyright 2025 Cowboy AI, LLC.

//! Write-side persistence seams
//!
//! [`WriteRepository`] is the per-aggregate persistence contract the command
//! pipeline drives; [`UnitOfWork`] marks the transactional boundary. The
//! in-memory implementations back tests and single-process deployments; a
//! relational adapter implements the same traits in production.

use crate::entity::{AggregateRoot, EntityName};
use crate::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Repository trait for loading and saving aggregates
#[async_trait]
pub trait WriteRepository<A: AggregateRoot>: Send + Sync {
    /// Load an aggregate by ID
    async fn find(&self, id: A::Id) -> DomainResult<Option<A>>;

    /// Persist a new aggregate
    async fn insert(&self, aggregate: &A) -> DomainResult<()>;

    /// Persist changes to an existing aggregate
    async fn update(&self, aggregate: &A) -> DomainResult<()>;

    /// Delete by ID; returns whether a row was affected
    async fn delete(&self, id: A::Id) -> DomainResult<bool>;
}

/// The transactional boundary for a single logical request
///
/// Every command handler stages its writes (including event-driven side
/// effects) and then commits exactly once; a storage adapter maps this onto
/// a database transaction.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commit all staged writes atomically
    async fn commit(&self) -> DomainResult<()>;
}

/// In-memory unit of work
///
/// Writes against the in-memory repositories apply immediately, so commit
/// only counts invocations, which is exactly what tests assert on.
#[derive(Default)]
pub struct InMemoryUnitOfWork {
    commits: AtomicU64,
}

impl InMemoryUnitOfWork {
    /// Create a new unit of work
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits performed
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&self) -> DomainResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory repository
///
/// Insertion order is preserved so read-model projections iterate
/// deterministically. Updates enforce the optimistic version check an SQL
/// adapter would express as a row-version predicate.
pub struct InMemoryRepository<A: AggregateRoot + Clone> {
    storage: RwLock<IndexMap<A::Id, A>>,
}

impl<A: AggregateRoot + Clone> InMemoryRepository<A> {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(IndexMap::new()),
        }
    }

    /// Snapshot all aggregates in insertion order
    pub async fn all(&self) -> Vec<A> {
        self.storage.read().await.values().cloned().collect()
    }

    /// Whether any stored aggregate satisfies the predicate
    pub async fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&A) -> bool,
    {
        self.storage.read().await.values().any(predicate)
    }

    /// Number of stored aggregates
    pub async fn count(&self) -> usize {
        self.storage.read().await.len()
    }
}

impl<A: AggregateRoot + Clone> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A> WriteRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + EntityName + Clone + Send + Sync,
{
    async fn find(&self, id: A::Id) -> DomainResult<Option<A>> {
        Ok(self.storage.read().await.get(&id).cloned())
    }

    async fn insert(&self, aggregate: &A) -> DomainResult<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(&aggregate.id()) {
            return Err(DomainError::AlreadyExists(format!(
                "{} with id {}",
                A::NAME,
                aggregate.id()
            )));
        }
        storage.insert(aggregate.id(), aggregate.clone());
        Ok(())
    }

    async fn update(&self, aggregate: &A) -> DomainResult<()> {
        let mut storage = self.storage.write().await;
        let Some(stored) = storage.get(&aggregate.id()) else {
            return Err(DomainError::not_found(A::NAME, aggregate.id()));
        };
        // Optimistic concurrency: the incoming aggregate must be exactly one
        // version ahead of the stored row.
        if stored.version() + 1 != aggregate.version() {
            return Err(DomainError::ConcurrencyConflict {
                expected: stored.version() + 1,
                actual: aggregate.version(),
            });
        }
        storage.insert(aggregate.id(), aggregate.clone());
        Ok(())
    }

    async fn delete(&self, id: A::Id) -> DomainResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.shift_remove(&id).is_some())
    }
}
