// Copyright 2025 Cowboy AI, LLC.

//! Concept aggregate
//!
//! A concept is the "what" of an expense or income (groceries, salary, rent)
//! and always belongs to a category; the reference is validated at create
//! and update time.

use crate::category::Category;
use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::cqrs::Command;
use crate::entity::{AggregateRoot, CategoryId, ConceptId, EntityName, UserId};
use crate::events::EventSource;
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::Name;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A concept under a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    id: ConceptId,
    owner_id: UserId,
    name: Name,
    category_id: CategoryId,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Concept {
    /// Create a concept under a category
    pub fn create(owner_id: UserId, name: Name, category_id: CategoryId) -> Self {
        Self {
            id: ConceptId::new(),
            owner_id,
            name,
            category_id,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Rename and/or move to another category
    pub fn update(&mut self, name: Name, category_id: CategoryId) {
        self.name = name;
        self.category_id = category_id;
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// The concept's name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The category this concept belongs to
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// When the concept was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Concept {
    type Id = ConceptId;

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

impl EntityName for Concept {
    const NAME: &'static str = "Concept";
}

impl EventSource for Concept {}

/// Create a new concept
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateConcept {
    /// The owning user
    pub owner_id: Uuid,
    /// Concept name
    pub name: String,
    /// Category the concept belongs to; must exist
    pub category_id: Uuid,
}

impl Command for CreateConcept {}

/// Update an existing concept
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateConcept {
    /// New name
    pub name: String,
    /// New category; must exist
    pub category_id: Uuid,
}

impl Command for UpdateConcept {}

/// Strategy spec for creating concepts
pub fn concept_create_spec() -> CreateSpec<CreateConcept, Concept> {
    CreateSpec {
        references: Box::new(|c: &CreateConcept| {
            vec![
                ForeignRef::new(User::NAME, c.owner_id),
                ForeignRef::new(Category::NAME, c.category_id),
            ]
        }),
        unique_name: None,
        construct: Box::new(|c: &CreateConcept| {
            Ok(Concept::create(
                UserId::from_uuid(c.owner_id),
                Name::new(c.name.as_str())?,
                CategoryId::from_uuid(c.category_id),
            ))
        }),
    }
}

/// Strategy spec for updating concepts
pub fn concept_update_spec() -> UpdateSpec<UpdateConcept, Concept> {
    UpdateSpec {
        references: Box::new(|c: &UpdateConcept| {
            vec![ForeignRef::new(Category::NAME, c.category_id)]
        }),
        apply: Box::new(|concept: &mut Concept, c: &UpdateConcept| {
            concept.update(
                Name::new(c.name.as_str())?,
                CategoryId::from_uuid(c.category_id),
            );
            Ok(())
        }),
    }
}

/// Concept read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConceptView {
    /// Concept's unique identifier
    pub concept_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Concept name
    pub name: String,
    /// Category the concept belongs to
    pub category_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for ConceptView {
    const NAME: &'static str = "Concept";
}

impl ListProjection for ConceptView {
    fn sortable_columns() -> &'static [&'static str] {
        &["name", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["name"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("name", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "concept_id"
    }
}

/// Project a concept into its view
pub fn project_concept(concept: &Concept) -> ConceptView {
    ConceptView {
        concept_id: *concept.id().as_uuid(),
        owner_id: *concept.owner_id().as_uuid(),
        name: concept.name().as_str().to_string(),
        category_id: *concept.category_id().as_uuid(),
        created_at: concept.created_at(),
    }
}
