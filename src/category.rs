// Copyright 2025 Cowboy AI, LLC.

//! Category aggregate
//!
//! Categories group concepts. The name is unique per owner, enforced by a
//! validator probe at create time, not by a database constraint.

use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::cqrs::Command;
use crate::entity::{AggregateRoot, CategoryId, EntityName, UserId};
use crate::events::EventSource;
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::{ForeignRef, NamedAggregate};
use crate::value_objects::{Description, Name};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending/income category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    owner_id: UserId,
    name: Name,
    description: Option<Description>,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Category {
    /// Create a category
    pub fn create(owner_id: UserId, name: Name, description: Option<Description>) -> Self {
        Self {
            id: CategoryId::new(),
            owner_id,
            name,
            description,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Update name and description
    pub fn update(&mut self, name: Name, description: Option<Description>) {
        self.name = name;
        self.description = description;
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// The category's name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Optional description
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// When the category was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Category {
    type Id = CategoryId;

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

impl EntityName for Category {
    const NAME: &'static str = "Category";
}

impl EventSource for Category {}

impl NamedAggregate for Category {
    fn owner_uuid(&self) -> Uuid {
        *self.owner_id.as_uuid()
    }

    fn display_name(&self) -> &str {
        self.name.as_str()
    }
}

/// Create a new category
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCategory {
    /// The owning user
    pub owner_id: Uuid,
    /// Category name, unique per owner
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

impl Command for CreateCategory {}

/// Update an existing category
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateCategory {
    /// New name
    pub name: String,
    /// New description
    pub description: Option<String>,
}

impl Command for UpdateCategory {}

/// Strategy spec for creating categories
pub fn category_create_spec() -> CreateSpec<CreateCategory, Category> {
    CreateSpec {
        references: Box::new(|c: &CreateCategory| vec![ForeignRef::new(User::NAME, c.owner_id)]),
        unique_name: Some(Box::new(|c: &CreateCategory| {
            (c.owner_id, c.name.trim().to_string())
        })),
        construct: Box::new(|c: &CreateCategory| {
            Ok(Category::create(
                UserId::from_uuid(c.owner_id),
                Name::new(c.name.as_str())?,
                Description::opt(c.description.clone())?,
            ))
        }),
    }
}

/// Strategy spec for updating categories
pub fn category_update_spec() -> UpdateSpec<UpdateCategory, Category> {
    UpdateSpec {
        references: Box::new(|_| Vec::new()),
        apply: Box::new(|category: &mut Category, c: &UpdateCategory| {
            category.update(
                Name::new(c.name.as_str())?,
                Description::opt(c.description.clone())?,
            );
            Ok(())
        }),
    }
}

/// Category read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryView {
    /// Category's unique identifier
    pub category_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Category name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for CategoryView {
    const NAME: &'static str = "Category";
}

impl ListProjection for CategoryView {
    fn sortable_columns() -> &'static [&'static str] {
        &["name", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["name", "description"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("name", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "category_id"
    }
}

/// Project a category into its view
pub fn project_category(category: &Category) -> CategoryView {
    CategoryView {
        category_id: *category.id().as_uuid(),
        owner_id: *category.owner_id().as_uuid(),
        name: category.name().as_str().to_string(),
        description: category.description().map(|d| d.as_str().to_string()),
        created_at: category.created_at(),
    }
}
