// Copyright 2025 Cowboy AI, LLC.

//! Entity identity and aggregate lifecycle types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// These IDs are globally unique and persistent. The phantom type
/// parameter ensures that IDs for different entity types cannot be
/// mixed up at compile time.
///
/// # Examples
///
/// ```rust
/// use fintrack_domain::{AccountId, CategoryId};
///
/// let account_id = AccountId::new();
/// let category_id = CategoryId::new();
///
/// // These are different types - won't compile if mixed up:
/// // let _: AccountId = category_id; // ERROR!
/// assert_ne!(account_id.as_uuid(), category_id.as_uuid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> From<&EntityId<T>> for Uuid {
    fn from(id: &EntityId<T>) -> Self {
        id.id
    }
}

/// Marker trait for aggregate roots
///
/// Aggregate roots are the entry points for modifying aggregates.
/// All changes to entities within an aggregate must go through the root,
/// and the version counter backs optimistic concurrency on writes.
pub trait AggregateRoot: Sized + Send + Sync {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + std::hash::Hash + fmt::Display + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

/// Stable entity-type name used for cache keys and error messages
///
/// Implemented by aggregates and by their read-model views, so the write
/// and read pipelines agree on key prefixes like `Account:{id}` and
/// `Account:list:…`.
pub trait EntityName {
    /// The entity-type name, e.g. `"Account"`
    const NAME: &'static str;
}

// Marker types for entity IDs
/// Marker for account entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountMarker;

/// Marker for category entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryMarker;

/// Marker for client entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientMarker;

/// Marker for payee entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayeeMarker;

/// Marker for person entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonMarker;

/// Marker for payment-method entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentMethodMarker;

/// Marker for concept entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConceptMarker;

/// Marker for expense entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseMarker;

/// Marker for income entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncomeMarker;

/// Marker for transfer entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferMarker;

/// Marker for scheduled-expense entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledExpenseMarker;

/// Marker for scheduled-income entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledIncomeMarker;

/// Marker for user entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserMarker;

/// Marker for command envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandMarker;

/// Marker for query envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryMarker;

/// Type alias for account IDs
pub type AccountId = EntityId<AccountMarker>;
/// Type alias for category IDs
pub type CategoryId = EntityId<CategoryMarker>;
/// Type alias for client IDs
pub type ClientId = EntityId<ClientMarker>;
/// Type alias for payee IDs
pub type PayeeId = EntityId<PayeeMarker>;
/// Type alias for person IDs
pub type PersonId = EntityId<PersonMarker>;
/// Type alias for payment-method IDs
pub type PaymentMethodId = EntityId<PaymentMethodMarker>;
/// Type alias for concept IDs
pub type ConceptId = EntityId<ConceptMarker>;
/// Type alias for expense IDs
pub type ExpenseId = EntityId<ExpenseMarker>;
/// Type alias for income IDs
pub type IncomeId = EntityId<IncomeMarker>;
/// Type alias for transfer IDs
pub type TransferId = EntityId<TransferMarker>;
/// Type alias for scheduled-expense IDs
pub type ScheduledExpenseId = EntityId<ScheduledExpenseMarker>;
/// Type alias for scheduled-income IDs
pub type ScheduledIncomeId = EntityId<ScheduledIncomeMarker>;
/// Type alias for user IDs
pub type UserId = EntityId<UserMarker>;
