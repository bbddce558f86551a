// Copyright 2025 Cowboy AI, LLC.

//! User aggregate
//!
//! The owning principal every other aggregate references. Authentication and
//! credential storage live outside the domain; this is only the profile the
//! ownership rules hang off.

use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::cqrs::Command;
use crate::entity::{AggregateRoot, EntityName, UserId};
use crate::errors::DomainResult;
use crate::events::EventSource;
use crate::read_model::{ListProjection, SortDirection};
use crate::value_objects::{Email, Name};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: Name,
    email: Email,
    created_at: DateTime<Utc>,
    version: u64,
}

impl User {
    /// Register a user
    pub fn create(name: Name, email: Email) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Update the profile
    pub fn update_profile(&mut self, name: Name, email: Email) {
        self.name = name;
        self.email = email;
    }

    /// The user's display name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The user's email address
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// When the user registered
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for User {
    type Id = UserId;

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

impl EntityName for User {
    const NAME: &'static str = "User";
}

impl EventSource for User {}

/// Register a new user
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateUser {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl Command for CreateUser {}

/// Update a user's profile
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUser {
    /// New display name
    pub name: String,
    /// New email address
    pub email: String,
}

impl Command for UpdateUser {}

/// Strategy spec for registering users
pub fn user_create_spec() -> CreateSpec<CreateUser, User> {
    CreateSpec {
        references: Box::new(|_| Vec::new()),
        unique_name: None,
        construct: Box::new(|c: &CreateUser| {
            Ok(User::create(
                Name::new(c.name.as_str())?,
                Email::new(c.email.as_str())?,
            ))
        }),
    }
}

/// Strategy spec for updating users
pub fn user_update_spec() -> UpdateSpec<UpdateUser, User> {
    UpdateSpec {
        references: Box::new(|_| Vec::new()),
        apply: Box::new(|user: &mut User, c: &UpdateUser| {
            user.update_profile(Name::new(c.name.as_str())?, Email::new(c.email.as_str())?);
            Ok(())
        }),
    }
}

/// User read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserView {
    /// User's unique identifier
    pub user_id: Uuid,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for UserView {
    const NAME: &'static str = "User";
}

impl ListProjection for UserView {
    fn sortable_columns() -> &'static [&'static str] {
        &["name", "email", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("name", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "user_id"
    }
}

/// Project a user into its view
pub fn project_user(user: &User) -> UserView {
    UserView {
        user_id: *user.id().as_uuid(),
        name: user.name().as_str().to_string(),
        email: user.email().as_str().to_string(),
        created_at: user.created_at(),
    }
}

/// Convenience constructor used by tests and fixtures
pub fn new_user(name: &str, email: &str) -> DomainResult<User> {
    Ok(User::create(Name::new(name)?, Email::new(email)?))
}
