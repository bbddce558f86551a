// Copyright 2025 Cowboy AI, LLC.

//! Transfer aggregate
//!
//! Moves an amount between two distinct accounts. Registration raises
//! [`TransferRegistered`], and the balance handler debits the source and
//! credits the destination inside the same unit of work. Transfers cannot be
//! edited in place; repositioning one means delete and recreate.

use crate::account::Account;
use crate::command_handlers::CreateSpec;
use crate::cqrs::Command;
use crate::entity::{AccountId, AggregateRoot, EntityName, TransferId, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::events::{DomainEventEnum, EventSource, TransferRegistered};
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::{Amount, Description};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transfer between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    id: TransferId,
    owner_id: UserId,
    source_account_id: AccountId,
    destination_account_id: AccountId,
    amount: Amount,
    date: NaiveDate,
    description: Option<Description>,
    created_at: DateTime<Utc>,
    version: u64,
    #[serde(skip)]
    pending_events: Vec<DomainEventEnum>,
}

impl Transfer {
    /// Register a transfer; source and destination must differ
    pub fn register(
        owner_id: UserId,
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Amount,
        date: NaiveDate,
        description: Option<Description>,
    ) -> DomainResult<Self> {
        if source_account_id == destination_account_id {
            return Err(DomainError::ValidationError(
                "Source and destination accounts must differ".to_string(),
            ));
        }
        let id = TransferId::new();
        let event = DomainEventEnum::TransferRegistered(TransferRegistered {
            transfer_id: id,
            source_account_id,
            destination_account_id,
            amount,
        });
        Ok(Self {
            id,
            owner_id,
            source_account_id,
            destination_account_id,
            amount,
            date,
            description,
            created_at: Utc::now(),
            version: 0,
            pending_events: vec![event],
        })
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Account the amount leaves
    pub fn source_account_id(&self) -> AccountId {
        self.source_account_id
    }

    /// Account the amount arrives at
    pub fn destination_account_id(&self) -> AccountId {
        self.destination_account_id
    }

    /// Amount moved
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Date of the transfer
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// When the transfer was registered
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Transfer {
    type Id = TransferId;

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

impl EntityName for Transfer {
    const NAME: &'static str = "Transfer";
}

impl EventSource for Transfer {
    fn take_events(&mut self) -> Vec<DomainEventEnum> {
        std::mem::take(&mut self.pending_events)
    }
}

/// Register a new transfer
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateTransfer {
    /// The owning user
    pub owner_id: Uuid,
    /// Account the amount leaves
    pub source_account_id: Uuid,
    /// Account the amount arrives at
    pub destination_account_id: Uuid,
    /// Amount to move; must be positive
    pub amount: Decimal,
    /// Date of the transfer
    pub date: NaiveDate,
    /// Optional note
    pub description: Option<String>,
}

impl Command for CreateTransfer {}

/// Strategy spec for registering transfers
pub fn transfer_create_spec() -> CreateSpec<CreateTransfer, Transfer> {
    CreateSpec {
        references: Box::new(|c: &CreateTransfer| {
            vec![
                ForeignRef::new(User::NAME, c.owner_id),
                ForeignRef::new(Account::NAME, c.source_account_id),
                ForeignRef::new(Account::NAME, c.destination_account_id),
            ]
        }),
        unique_name: None,
        construct: Box::new(|c: &CreateTransfer| {
            Transfer::register(
                UserId::from_uuid(c.owner_id),
                AccountId::from_uuid(c.source_account_id),
                AccountId::from_uuid(c.destination_account_id),
                Amount::new(c.amount)?,
                c.date,
                Description::opt(c.description.clone())?,
            )
        }),
    }
}

/// In-place transfer mutation is deliberately unsupported; callers delete
/// and recreate instead
pub fn transfer_update_rejected() -> DomainError {
    DomainError::UnsupportedOperation {
        entity_type: Transfer::NAME,
        operation: "update",
    }
}

/// Transfer read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferView {
    /// Transfer's unique identifier
    pub transfer_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Account the amount leaves
    pub source_account_id: Uuid,
    /// Account the amount arrives at
    pub destination_account_id: Uuid,
    /// Amount moved
    pub amount: Decimal,
    /// Date of the transfer
    pub date: NaiveDate,
    /// Optional note
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for TransferView {
    const NAME: &'static str = "Transfer";
}

impl ListProjection for TransferView {
    fn sortable_columns() -> &'static [&'static str] {
        &["date", "amount", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["description", "amount", "date"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("date", SortDirection::Descending)
    }

    fn id_column() -> &'static str {
        "transfer_id"
    }
}

/// Project a transfer into its view
pub fn project_transfer(transfer: &Transfer) -> TransferView {
    TransferView {
        transfer_id: *transfer.id.as_uuid(),
        owner_id: *transfer.owner_id.as_uuid(),
        source_account_id: *transfer.source_account_id.as_uuid(),
        destination_account_id: *transfer.destination_account_id.as_uuid(),
        amount: transfer.amount.value(),
        date: transfer.date,
        description: transfer.description.as_ref().map(|d| d.as_str().to_string()),
        created_at: transfer.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn register(
        source: AccountId,
        destination: AccountId,
    ) -> DomainResult<Transfer> {
        Transfer::register(
            UserId::new(),
            source,
            destination,
            Amount::new(dec!(50)).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            None,
        )
    }

    /// Same-account transfers fail before anything could persist
    #[test]
    fn register_rejects_same_account() {
        let account = AccountId::new();
        let err = register(account, account).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn register_raises_transfer_registered() {
        let source = AccountId::new();
        let destination = AccountId::new();
        let mut transfer = register(source, destination).unwrap();

        let events = transfer.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEventEnum::TransferRegistered(e) => {
                assert_eq!(e.source_account_id, source);
                assert_eq!(e.destination_account_id, destination);
                assert_eq!(e.amount.value(), dec!(50));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn update_is_rejected_as_unsupported() {
        let err = transfer_update_rejected();
        assert!(matches!(
            err,
            DomainError::UnsupportedOperation {
                entity_type: "Transfer",
                operation: "update",
            }
        ));
    }
}
