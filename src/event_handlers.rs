// Copyright 2025 Cowboy AI, LLC.

//! Domain event handlers
//!
//! Events raised by aggregates are dispatched synchronously, in-process, by
//! the command pipeline before the unit of work commits, so event-driven side
//! effects land in the same atomic commit as the triggering write. A handler
//! error aborts the whole operation, with one deliberate exception noted on
//! [`BalanceUpdateHandler`].

use crate::account::Account;
use crate::cache::{entity_key, list_prefix, Cache};
use crate::entity::{AccountId, AggregateRoot, EntityName};
use crate::errors::{DomainError, DomainResult};
use crate::events::{DomainEventEnum, IncomeMarkedDeleted, IncomeRegistered, TransferRegistered};
use crate::repository::WriteRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handler for domain events
#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    /// React to one event; errors abort the surrounding unit of work
    async fn handle(&self, event: &DomainEventEnum) -> DomainResult<()>;
}

/// Ordered, synchronous event dispatcher
///
/// Handlers run in registration order within the caller's unit of work.
/// There is no persistence and no retry: events are transient values,
/// consumed once and discarded.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn DomainEventHandler>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; order of registration is dispatch order
    pub fn register(&mut self, handler: Arc<dyn DomainEventHandler>) {
        self.handlers.push(handler);
    }

    /// Builder-style registration
    pub fn with_handler(mut self, handler: Arc<dyn DomainEventHandler>) -> Self {
        self.register(handler);
        self
    }

    /// Dispatch one event to every handler
    pub async fn dispatch(&self, event: &DomainEventEnum) -> DomainResult<()> {
        debug!(event_type = event.event_type(), "dispatching domain event");
        for handler in &self.handlers {
            handler.handle(event).await?;
        }
        Ok(())
    }

    /// Dispatch a batch of events in order
    pub async fn dispatch_all(&self, events: &[DomainEventEnum]) -> DomainResult<()> {
        for event in events {
            self.dispatch(event).await?;
        }
        Ok(())
    }
}

/// Applies balance effects of transfers and incomes to accounts
///
/// All staged account writes join the triggering command's unit of work, so
/// a transfer and both balance updates commit (or abort) together.
///
/// A failed withdrawal on the transfer path is caught here and logged: the
/// withdraw is attempted before the deposit, so a rejection leaves both
/// accounts untouched. That catch is unique to transfers; income reversal
/// errors propagate and abort the delete.
pub struct BalanceUpdateHandler {
    accounts: Arc<dyn WriteRepository<Account>>,
    cache: Arc<dyn Cache>,
}

impl BalanceUpdateHandler {
    /// Create a handler over the account repository
    pub fn new(accounts: Arc<dyn WriteRepository<Account>>, cache: Arc<dyn Cache>) -> Self {
        Self { accounts, cache }
    }

    async fn load(&self, id: AccountId, context: &str) -> DomainResult<Account> {
        // Referential checks ran at command time, so a miss here is an
        // invariant violation, not a user error; surface it instead of
        // silently dropping the effect.
        self.accounts.find(id).await?.ok_or_else(|| {
            DomainError::Unexpected(format!("{context} references a missing account {id}"))
        })
    }

    async fn store(&self, account: &mut Account) -> DomainResult<()> {
        account.increment_version();
        self.accounts.update(account).await?;
        self.cache
            .remove(&entity_key(Account::NAME, account.id()))
            .await?;
        Ok(())
    }

    async fn apply_transfer(&self, event: &TransferRegistered) -> DomainResult<()> {
        let (source, destination) = tokio::join!(
            self.load(event.source_account_id, "transfer source"),
            self.load(event.destination_account_id, "transfer destination"),
        );
        let (mut source, mut destination) = (source?, destination?);

        // Withdraw first: a rejection must prevent the deposit.
        match source.withdraw(&event.amount) {
            Ok(()) => {}
            Err(err @ DomainError::InsufficientFunds { .. }) => {
                warn!(
                    transfer_id = %event.transfer_id,
                    source = %event.source_account_id,
                    %err,
                    "transfer withdrawal rejected; balances unchanged"
                );
                return Ok(());
            }
            Err(other) => return Err(other),
        }
        destination.deposit(&event.amount);

        self.store(&mut source).await?;
        self.store(&mut destination).await?;
        self.cache
            .remove_by_prefix(&list_prefix(Account::NAME))
            .await?;
        Ok(())
    }

    async fn apply_income(&self, event: &IncomeRegistered) -> DomainResult<()> {
        let mut account = self.load(event.account_id, "income").await?;
        account.deposit(&event.amount);

        self.store(&mut account).await?;
        self.cache
            .remove_by_prefix(&list_prefix(Account::NAME))
            .await?;
        Ok(())
    }

    async fn reverse_income(&self, event: &IncomeMarkedDeleted) -> DomainResult<()> {
        let mut account = self.load(event.account_id, "income reversal").await?;
        // Errors (including insufficient funds) propagate: an unreversible
        // deletion must abort rather than leave balances skewed.
        account.withdraw(&event.amount)?;

        self.store(&mut account).await?;
        self.cache
            .remove_by_prefix(&list_prefix(Account::NAME))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DomainEventHandler for BalanceUpdateHandler {
    async fn handle(&self, event: &DomainEventEnum) -> DomainResult<()> {
        match event {
            DomainEventEnum::TransferRegistered(e) => self.apply_transfer(e).await,
            DomainEventEnum::IncomeRegistered(e) => self.apply_income(e).await,
            DomainEventEnum::IncomeMarkedDeleted(e) => self.reverse_income(e).await,
        }
    }
}
