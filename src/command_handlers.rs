// Copyright 2025 Cowboy AI, LLC.

//! Generic command pipeline
//!
//! One algorithm serves every aggregate: validate foreign references,
//! construct or mutate the aggregate through an entity-supplied strategy,
//! persist, dispatch raised domain events, commit, and invalidate the read
//! cache. Entities plug in behavior through [`CreateSpec`]/[`UpdateSpec`]
//! strategy objects instead of subclass hooks, so the pipeline is plain
//! composition over trait objects.
//!
//! Business failures come back as typed [`DomainError`] values (value-object
//! construction errors surface as `Validation`, dangling references as
//! `NotFound`), never as panics. Storage-level uniqueness/concurrency
//! conflicts intentionally propagate untouched for the outer layer to
//! translate.

use crate::cache::{entity_key, list_prefix, Cache};
use crate::cqrs::{Command, CommandEnvelope};
use crate::entity::{AggregateRoot, EntityName};
use crate::errors::{DomainError, DomainResult};
use crate::event_handlers::EventDispatcher;
use crate::events::EventSource;
use crate::repository::{UnitOfWork, WriteRepository};
use crate::validation::{DomainValidator, ForeignRef};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Strategy: extract the foreign references a command depends on
pub type RefsFn<C> = Box<dyn Fn(&C) -> Vec<ForeignRef> + Send + Sync>;

/// Strategy: extract the (owner, name) pair covered by a per-owner
/// uniqueness rule
pub type UniqueNameFn<C> = Box<dyn Fn(&C) -> (Uuid, String) + Send + Sync>;

/// Strategy: build a new aggregate from a create command
pub type ConstructFn<C, A> = Box<dyn Fn(&C) -> DomainResult<A> + Send + Sync>;

/// Strategy: apply an update command to a loaded aggregate
pub type ApplyFn<C, A> = Box<dyn Fn(&mut A, &C) -> DomainResult<()> + Send + Sync>;

/// Per-entity strategy for the create flow
pub struct CreateSpec<C, A> {
    /// Foreign references to validate before anything persists
    pub references: RefsFn<C>,
    /// Per-owner name-uniqueness rule, when the entity has one
    pub unique_name: Option<UniqueNameFn<C>>,
    /// Aggregate factory wrapping raw command fields into value objects
    pub construct: ConstructFn<C, A>,
}

/// Per-entity strategy for the update flow
pub struct UpdateSpec<C, A> {
    /// Foreign references to validate before anything persists
    pub references: RefsFn<C>,
    /// Mutation hook calling the aggregate's domain `update` method
    pub apply: ApplyFn<C, A>,
}

/// Generic command handler for one aggregate type
///
/// Holds the collaborating seams as trait objects; entity-specific behavior
/// arrives per call as a strategy spec.
pub struct CommandPipeline<A: AggregateRoot> {
    repository: Arc<dyn WriteRepository<A>>,
    validator: Arc<DomainValidator>,
    cache: Arc<dyn Cache>,
    dispatcher: Arc<EventDispatcher>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl<A> CommandPipeline<A>
where
    A: AggregateRoot + EntityName + EventSource,
{
    /// Assemble a pipeline from its collaborators
    pub fn new(
        repository: Arc<dyn WriteRepository<A>>,
        validator: Arc<DomainValidator>,
        cache: Arc<dyn Cache>,
        dispatcher: Arc<EventDispatcher>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            repository,
            validator,
            cache,
            dispatcher,
            unit_of_work,
        }
    }

    /// Handle a create command
    ///
    /// Validates references and uniqueness, constructs the aggregate,
    /// persists it, dispatches any raised events inside the same unit of
    /// work, commits, and invalidates the entity's list caches. The
    /// get-by-id key needs no invalidation: the new id was never cached.
    pub async fn create<C: Command>(
        &self,
        envelope: CommandEnvelope<C>,
        spec: &CreateSpec<C, A>,
    ) -> DomainResult<A::Id> {
        let command = &envelope.command;

        self.validator
            .require_all(&(spec.references)(command))
            .await?;
        if let Some(unique_name) = &spec.unique_name {
            let (owner, name) = unique_name(command);
            self.validator.name_available(A::NAME, owner, &name).await?;
        }

        let mut aggregate = (spec.construct)(command)?;
        let id = aggregate.id();
        // Drain events before persisting so the stored row carries none.
        let events = aggregate.take_events();
        self.repository.insert(&aggregate).await?;
        self.dispatcher.dispatch_all(&events).await?;
        self.unit_of_work.commit().await?;

        self.cache.remove_by_prefix(&list_prefix(A::NAME)).await?;
        info!(command_id = %envelope.id, entity = A::NAME, %id, "created");
        Ok(id)
    }

    /// Handle an update command against an existing aggregate
    ///
    /// Returns only the id; callers needing fresh data re-fetch through the
    /// query side, trading one cache round-trip for simple invalidation.
    pub async fn update<C: Command>(
        &self,
        id: A::Id,
        envelope: CommandEnvelope<C>,
        spec: &UpdateSpec<C, A>,
    ) -> DomainResult<A::Id> {
        let command = &envelope.command;

        let mut aggregate = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(A::NAME, id))?;

        self.validator
            .require_all(&(spec.references)(command))
            .await?;

        (spec.apply)(&mut aggregate, command)?;
        aggregate.increment_version();
        let events = aggregate.take_events();
        self.repository.update(&aggregate).await?;
        self.dispatcher.dispatch_all(&events).await?;
        self.unit_of_work.commit().await?;

        self.invalidate(id).await?;
        info!(command_id = %envelope.id, entity = A::NAME, %id, "updated");
        Ok(id)
    }

    /// Handle a delete by id
    ///
    /// No read-before-write: the storage layer's affected-rows signal
    /// distinguishes a real delete from a missing row.
    pub async fn delete(&self, id: A::Id) -> DomainResult<A::Id> {
        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(A::NAME, id));
        }
        self.unit_of_work.commit().await?;

        self.invalidate(id).await?;
        info!(entity = A::NAME, %id, "deleted");
        Ok(id)
    }

    /// Handle a delete whose side effects must be reversed first
    ///
    /// The override point for entities like Income: the full aggregate is
    /// loaded, the `mark` hook raises the reversal events, those are
    /// dispatched inside the same unit of work, and only then is the row
    /// deleted. Correctness outweighs the read-before-write saving here.
    pub async fn delete_reversing(
        &self,
        id: A::Id,
        mark: fn(&mut A) -> DomainResult<()>,
    ) -> DomainResult<A::Id> {
        let mut aggregate = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(A::NAME, id))?;

        mark(&mut aggregate)?;
        let events = aggregate.take_events();
        self.dispatcher.dispatch_all(&events).await?;

        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found(A::NAME, id));
        }
        self.unit_of_work.commit().await?;

        self.invalidate(id).await?;
        info!(entity = A::NAME, %id, "deleted with reversal");
        Ok(id)
    }

    /// Drop the point-lookup key and every cached list for this entity type
    async fn invalidate(&self, id: A::Id) -> DomainResult<()> {
        self.cache.remove(&entity_key(A::NAME, id)).await?;
        self.cache.remove_by_prefix(&list_prefix(A::NAME)).await?;
        debug!(entity = A::NAME, %id, "cache invalidated");
        Ok(())
    }
}
