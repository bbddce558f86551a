// Copyright 2025 Cowboy AI, LLC.

//! # CQRS (Command Query Responsibility Segregation) Pattern
//!
//! Foundational types for the command/query split. Commands represent write
//! operations that modify state; queries represent read operations. Handlers
//! return a discriminated [`DomainResult`](crate::DomainResult): expected
//! business failures are values, never panics.

use crate::entity::{CommandMarker, EntityId, QueryMarker, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A command that requests a state change
///
/// Commands are write operations that modify state. They should be named
/// with imperative verbs (`CreateAccount`, `UpdateCategory`, `DeleteExpense`)
/// and carry raw primitive fields; the handler wraps them into value objects.
pub trait Command: Debug + Send + Sync {}

/// A query that requests data without modifying state
///
/// Queries are read operations that return data. They should be named
/// to describe what they return (`GetById`, a paged-list request).
pub trait Query: Debug + Send + Sync {}

/// Type alias for command IDs
pub type CommandId = EntityId<CommandMarker>;

/// Type alias for query IDs
pub type QueryId = EntityId<QueryMarker>;

/// A command with metadata for tracking and auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope<C> {
    /// Unique identifier for this command instance
    pub id: CommandId,
    /// The actual command
    pub command: C,
    /// Who issued this command
    pub issued_by: UserId,
}

impl<C: Command> CommandEnvelope<C> {
    /// Create a new command envelope
    pub fn new(command: C, issued_by: UserId) -> Self {
        Self {
            id: CommandId::new(),
            command,
            issued_by,
        }
    }
}

/// A query with metadata for tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEnvelope<Q> {
    /// Unique identifier for this query instance
    pub id: QueryId,
    /// The actual query
    pub query: Q,
    /// Who issued this query
    pub issued_by: UserId,
}

impl<Q: Query> QueryEnvelope<Q> {
    /// Create a new query envelope
    pub fn new(query: Q, issued_by: UserId) -> Self {
        Self {
            id: QueryId::new(),
            query,
            issued_by,
        }
    }
}

/// Query to fetch a single read-model projection by id
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GetById {
    /// The id of the record to fetch
    pub id: uuid::Uuid,
}

impl Query for GetById {}
