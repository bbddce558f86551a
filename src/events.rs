// Copyright 2025 Cowboy AI, LLC.

//! Domain events
//!
//! Events represent facts that have occurred in the domain. They are raised
//! by aggregates during state changes and consumed synchronously, in-process,
//! before the unit of work commits. Aggregates expose their pending events
//! through [`EventSource::take_events`], so the effect list is part of the
//! operation's visible contract rather than hidden bus state.

use crate::entity::{AccountId, IncomeId, TransferId};
use crate::value_objects::Amount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base trait for all domain events
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;
}

/// A transfer between two accounts was registered
///
/// Carries everything the balance handler needs to debit the source and
/// credit the destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRegistered {
    /// The transfer that was registered
    pub transfer_id: TransferId,
    /// Account the amount leaves
    pub source_account_id: AccountId,
    /// Account the amount arrives at
    pub destination_account_id: AccountId,
    /// Amount moved
    pub amount: Amount,
}

impl DomainEvent for TransferRegistered {
    fn aggregate_id(&self) -> Uuid {
        *self.transfer_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "TransferRegistered"
    }
}

/// An income was registered against an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRegistered {
    /// The income that was registered
    pub income_id: IncomeId,
    /// Account the income is deposited into
    pub account_id: AccountId,
    /// Amount deposited
    pub amount: Amount,
}

impl DomainEvent for IncomeRegistered {
    fn aggregate_id(&self) -> Uuid {
        *self.income_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "IncomeRegistered"
    }
}

/// An income was marked as deleted; its deposit must be reversed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeMarkedDeleted {
    /// The income being deleted
    pub income_id: IncomeId,
    /// Account whose balance is reversed
    pub account_id: AccountId,
    /// Amount to withdraw back
    pub amount: Amount,
}

impl DomainEvent for IncomeMarkedDeleted {
    fn aggregate_id(&self) -> Uuid {
        *self.income_id.as_uuid()
    }

    fn event_type(&self) -> &'static str {
        "IncomeMarkedDeleted"
    }
}

/// Enum wrapper for all domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEventEnum {
    /// A transfer was registered
    TransferRegistered(TransferRegistered),
    /// An income was registered
    IncomeRegistered(IncomeRegistered),
    /// An income was marked as deleted
    IncomeMarkedDeleted(IncomeMarkedDeleted),
}

impl DomainEventEnum {
    /// The aggregate the wrapped event relates to
    pub fn aggregate_id(&self) -> Uuid {
        match self {
            DomainEventEnum::TransferRegistered(e) => e.aggregate_id(),
            DomainEventEnum::IncomeRegistered(e) => e.aggregate_id(),
            DomainEventEnum::IncomeMarkedDeleted(e) => e.aggregate_id(),
        }
    }

    /// The wrapped event's type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEventEnum::TransferRegistered(e) => e.event_type(),
            DomainEventEnum::IncomeRegistered(e) => e.event_type(),
            DomainEventEnum::IncomeMarkedDeleted(e) => e.event_type(),
        }
    }
}

/// Source of pending domain events
///
/// Aggregates that raise events buffer them internally during domain
/// operations; the command pipeline drains the buffer once per handled
/// command and dispatches before commit. Aggregates with no events keep
/// the default empty implementation.
pub trait EventSource {
    /// Drain and return the events raised since the last call
    fn take_events(&mut self) -> Vec<DomainEventEnum> {
        Vec::new()
    }
}
