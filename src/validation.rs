// Copyright 2025 Cowboy AI, LLC.

//! Cross-aggregate existence validation
//!
//! Before a command with foreign references is allowed to persist anything,
//! every referenced id is probed for existence. Probes are minimal reads
//! (the relational adapter issues `SELECT 1 ... LIMIT 1`), and independent
//! probes for one command run in parallel. Probes hold no shared mutable
//! state, so concurrent invocation is safe.

use crate::entity::{AggregateRoot, EntityId, EntityName};
use crate::errors::{DomainError, DomainResult};
use crate::repository::{InMemoryRepository, WriteRepository};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A foreign reference carried by a command, pending validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignRef {
    /// Entity type the reference points at
    pub entity_type: &'static str,
    /// The referenced id
    pub id: Uuid,
}

impl ForeignRef {
    /// Build a reference to an entity type
    pub fn new(entity_type: &'static str, id: Uuid) -> Self {
        Self { entity_type, id }
    }
}

/// Minimal existence probe for one entity type
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    /// Whether a record with this id exists
    async fn exists(&self, id: Uuid) -> DomainResult<bool>;

    /// Whether the owner already has a record with this name
    ///
    /// Only named entity types override this; the default says no.
    async fn name_in_use(&self, owner_id: Uuid, name: &str) -> DomainResult<bool> {
        let _ = (owner_id, name);
        Ok(false)
    }
}

/// Registry of existence probes keyed by entity-type name
///
/// `Exists(entityType, id)` for the whole domain: command pipelines resolve
/// the probe for each [`ForeignRef`] and run the checks concurrently.
#[derive(Default)]
pub struct DomainValidator {
    probes: HashMap<&'static str, Arc<dyn ExistenceProbe>>,
}

impl DomainValidator {
    /// Create an empty validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the probe for an entity type
    pub fn register(&mut self, entity_type: &'static str, probe: Arc<dyn ExistenceProbe>) {
        self.probes.insert(entity_type, probe);
    }

    fn probe(&self, entity_type: &str) -> DomainResult<&Arc<dyn ExistenceProbe>> {
        self.probes.get(entity_type).ok_or_else(|| {
            DomainError::Unexpected(format!("No existence probe registered for {entity_type}"))
        })
    }

    /// Whether a record of the given type and id exists
    pub async fn exists(&self, entity_type: &str, id: Uuid) -> DomainResult<bool> {
        self.probe(entity_type)?.exists(id).await
    }

    /// Require one referenced record to exist
    pub async fn require(&self, reference: &ForeignRef) -> DomainResult<()> {
        if self.exists(reference.entity_type, reference.id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(reference.entity_type, reference.id))
        }
    }

    /// Require every referenced record to exist, probing in parallel
    pub async fn require_all(&self, references: &[ForeignRef]) -> DomainResult<()> {
        try_join_all(references.iter().map(|r| self.require(r))).await?;
        Ok(())
    }

    /// Require that the owner does not already use this name
    pub async fn name_available(
        &self,
        entity_type: &'static str,
        owner_id: Uuid,
        name: &str,
    ) -> DomainResult<()> {
        if self.probe(entity_type)?.name_in_use(owner_id, name).await? {
            Err(DomainError::AlreadyExists(format!(
                "{entity_type} named '{name}' for this owner"
            )))
        } else {
            Ok(())
        }
    }
}

/// Aggregates with a per-owner-unique display name
pub trait NamedAggregate: AggregateRoot {
    /// The owning user
    fn owner_uuid(&self) -> Uuid;

    /// The display name the uniqueness rule applies to
    fn display_name(&self) -> &str;
}

/// Existence probe over an in-memory repository (id checks only)
pub struct RepositoryProbe<A: AggregateRoot + Clone> {
    repository: Arc<InMemoryRepository<A>>,
}

impl<A: AggregateRoot + Clone> RepositoryProbe<A> {
    /// Create a probe over a repository
    pub fn new(repository: Arc<InMemoryRepository<A>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<M, A> ExistenceProbe for RepositoryProbe<A>
where
    M: Send + Sync + 'static,
    A: AggregateRoot<Id = EntityId<M>> + EntityName + Clone + Send + Sync + 'static,
{
    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self
            .repository
            .find(EntityId::from_uuid(id))
            .await?
            .is_some())
    }
}

/// Existence probe over an in-memory repository of named aggregates
///
/// Adds the per-owner name scan the relational adapter expresses as a
/// `WHERE owner_id = ? AND name = ?` probe. Matching is case-insensitive,
/// so "Food" and "food" collide.
pub struct NamedRepositoryProbe<A: NamedAggregate + Clone> {
    repository: Arc<InMemoryRepository<A>>,
}

impl<A: NamedAggregate + Clone> NamedRepositoryProbe<A> {
    /// Create a probe over a repository of named aggregates
    pub fn new(repository: Arc<InMemoryRepository<A>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<M, A> ExistenceProbe for NamedRepositoryProbe<A>
where
    M: Send + Sync + 'static,
    A: NamedAggregate<Id = EntityId<M>> + EntityName + Clone + Send + Sync + 'static,
{
    async fn exists(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self
            .repository
            .find(EntityId::from_uuid(id))
            .await?
            .is_some())
    }

    async fn name_in_use(&self, owner_id: Uuid, name: &str) -> DomainResult<bool> {
        let needle = name.to_lowercase();
        Ok(self
            .repository
            .any(|a| a.owner_uuid() == owner_id && a.display_name().to_lowercase() == needle)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AccountId, EntityName};
    use crate::repository::WriteRepository;

    #[derive(Clone)]
    struct Tagged {
        id: AccountId,
        owner: Uuid,
        name: String,
        version: u64,
    }

    impl AggregateRoot for Tagged {
        type Id = AccountId;
        fn id(&self) -> Self::Id {
            self.id
        }
        fn version(&self) -> u64 {
            self.version
        }
        fn increment_version(&mut self) {
            self.version += 1;
        }
    }

    impl EntityName for Tagged {
        const NAME: &'static str = "Tagged";
    }

    impl NamedAggregate for Tagged {
        fn owner_uuid(&self) -> Uuid {
            self.owner
        }
        fn display_name(&self) -> &str {
            &self.name
        }
    }

    async fn validator_with_tagged() -> (DomainValidator, Arc<InMemoryRepository<Tagged>>, Tagged) {
        let repo = Arc::new(InMemoryRepository::<Tagged>::new());
        let record = Tagged {
            id: AccountId::new(),
            owner: Uuid::new_v4(),
            name: "Food".to_string(),
            version: 0,
        };
        repo.insert(&record).await.unwrap();

        let mut validator = DomainValidator::new();
        validator.register("Tagged", Arc::new(NamedRepositoryProbe::new(repo.clone())));
        (validator, repo, record)
    }

    #[tokio::test]
    async fn existing_reference_passes() {
        let (validator, _repo, record) = validator_with_tagged().await;

        let reference = ForeignRef::new("Tagged", *record.id.as_uuid());
        validator.require(&reference).await.unwrap();
        assert!(validator.exists("Tagged", *record.id.as_uuid()).await.unwrap());
    }

    #[tokio::test]
    async fn dangling_reference_is_not_found() {
        let (validator, _repo, _record) = validator_with_tagged().await;

        let reference = ForeignRef::new("Tagged", Uuid::new_v4());
        let err = validator.require(&reference).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unregistered_probe_is_unexpected() {
        let validator = DomainValidator::new();
        let err = validator.exists("Ghost", Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    /// Parallel probes: one dangling reference fails the batch
    #[tokio::test]
    async fn require_all_fails_on_any_missing() {
        let (validator, _repo, record) = validator_with_tagged().await;

        let references = [
            ForeignRef::new("Tagged", *record.id.as_uuid()),
            ForeignRef::new("Tagged", Uuid::new_v4()),
        ];
        let err = validator.require_all(&references).await.unwrap_err();
        assert!(err.is_not_found());

        validator
            .require_all(&references[..1])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn name_uniqueness_is_owner_scoped_and_case_insensitive() {
        let (validator, _repo, record) = validator_with_tagged().await;

        let err = validator
            .name_available("Tagged", record.owner, "food")
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Same name under another owner is fine
        validator
            .name_available("Tagged", Uuid::new_v4(), "Food")
            .await
            .unwrap();

        // Different name under the same owner is fine
        validator
            .name_available("Tagged", record.owner, "Travel")
            .await
            .unwrap();
    }
}
