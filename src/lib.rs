//! # FinTrack Domain
//!
//! CQRS command/query pipeline and domain model for the FinTrack personal
//! finance backend.
//!
//! Every feature (accounts, categories, clients, concepts, expenses,
//! incomes, transfers, scheduled rules) is an instantiation of one generic
//! pipeline:
//! - **Commands** flow through [`CommandPipeline`]: foreign references are
//!   validated, the aggregate is built or mutated through a per-entity
//!   strategy spec, writes are persisted and committed in one unit of work,
//!   and read caches are invalidated.
//! - **Queries** flow through [`QueryPipeline`]: cache-aside point lookups
//!   and paged lists over DTO projections with whitelisted sort/search
//!   columns.
//! - **Domain events** raised by aggregates (transfer registration, income
//!   registration and deletion) are dispatched synchronously before commit,
//!   so balance side effects land in the same transaction as the triggering
//!   write.
//!
//! ## Design Principles
//!
//! 1. **Type Safety**: phantom-typed ids; an `AccountId` is never a
//!    `CategoryId`
//! 2. **Immutability**: value objects validate once, at construction
//! 3. **Composition**: one pipeline algorithm with per-entity strategy
//!    objects instead of inheritance hierarchies
//! 4. **Typed failures**: business errors are [`DomainError`] values mapped
//!    onto a four-way [`FailureKind`] taxonomy; handlers never panic
//! 5. **Visible effects**: aggregates return their raised events through
//!    [`EventSource`], so side effects are testable without infrastructure

#![warn(missing_docs)]

mod account;
mod cache;
mod category;
mod command_handlers;
mod concept;
mod cqrs;
mod entity;
mod errors;
mod event_handlers;
mod events;
mod expense;
mod income;
mod parties;
mod query_handlers;
mod read_model;
mod repository;
mod scheduled;
mod scheduling;
mod transfer;
mod user;
mod validation;
mod value_objects;

// Re-export core types
pub use entity::{
    AccountId, AccountMarker, AggregateRoot, CategoryId, CategoryMarker, ClientId, ClientMarker,
    CommandMarker, ConceptId, ConceptMarker, EntityId, EntityName, ExpenseId, ExpenseMarker,
    IncomeId, IncomeMarker, PayeeId, PayeeMarker, PaymentMethodId, PaymentMethodMarker, PersonId,
    PersonMarker, QueryMarker, ScheduledExpenseId, ScheduledExpenseMarker, ScheduledIncomeId,
    ScheduledIncomeMarker, TransferId, TransferMarker, UserId, UserMarker,
};
pub use errors::{DomainError, DomainResult, FailureKind};
pub use value_objects::{
    Amount, Description, Email, Name, MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
pub use cqrs::{Command, CommandEnvelope, CommandId, GetById, Query, QueryEnvelope, QueryId};
pub use events::{
    DomainEvent, DomainEventEnum, EventSource, IncomeMarkedDeleted, IncomeRegistered,
    TransferRegistered,
};
pub use cache::{entity_key, list_prefix, Cache, CacheConfig, InMemoryCache};
pub use repository::{InMemoryRepository, InMemoryUnitOfWork, UnitOfWork, WriteRepository};
pub use validation::{
    DomainValidator, ExistenceProbe, ForeignRef, NamedAggregate, NamedRepositoryProbe,
    RepositoryProbe,
};
pub use read_model::{
    ListProjection, Page, PageRequest, ProjectingReadModel, ReadModelStorage, SortDirection,
};
pub use command_handlers::{
    ApplyFn, CommandPipeline, ConstructFn, CreateSpec, RefsFn, UniqueNameFn, UpdateSpec,
};
pub use query_handlers::{QueryConfig, QueryPipeline};
pub use event_handlers::{BalanceUpdateHandler, DomainEventHandler, EventDispatcher};
pub use scheduling::{JobScheduler, UuidJobScheduler};

// Re-export aggregates, commands, views, and strategy specs
pub use account::{
    account_create_spec, account_update_spec, project_account, Account, AccountView,
    CreateAccount, UpdateAccount,
};
pub use category::{
    category_create_spec, category_update_spec, project_category, Category, CategoryView,
    CreateCategory, UpdateCategory,
};
pub use concept::{
    concept_create_spec, concept_update_spec, project_concept, Concept, ConceptView,
    CreateConcept, UpdateConcept,
};
pub use parties::{
    client_create_spec, client_update_spec, payee_create_spec, payee_update_spec,
    payment_method_create_spec, payment_method_update_spec, person_create_spec,
    person_update_spec, project_client, project_payee, project_payment_method, project_person,
    Client, ClientView, CreateClient, CreatePayee, CreatePaymentMethod, CreatePerson, Payee,
    PayeeView, PaymentMethod, PaymentMethodView, Person, PersonView, UpdateClient, UpdatePayee,
    UpdatePaymentMethod, UpdatePerson,
};
pub use expense::{
    expense_create_spec, expense_update_spec, project_expense, CreateExpense, Expense,
    ExpenseFields, ExpenseView, UpdateExpense,
};
pub use income::{
    income_create_spec, income_update_spec, project_income, CreateIncome, Income, IncomeFields,
    IncomeView, UpdateIncome,
};
pub use transfer::{
    project_transfer, transfer_create_spec, transfer_update_rejected, CreateTransfer, Transfer,
    TransferView,
};
pub use scheduled::{
    project_scheduled_expense, project_scheduled_income, scheduled_expense_create_spec,
    scheduled_expense_update_rejected, scheduled_income_create_spec,
    scheduled_income_update_rejected, CreateScheduledExpense, CreateScheduledIncome, Frequency,
    ScheduledExpense, ScheduledExpenseView, ScheduledIncome, ScheduledIncomeView,
};
pub use user::{
    new_user, project_user, user_create_spec, user_update_spec, CreateUser, UpdateUser, User,
    UserView,
};
