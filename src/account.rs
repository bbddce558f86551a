// Copyright 2025 Cowboy AI, LLC.

//! Account aggregate
//!
//! An account holds a currency-agnostic decimal balance owned by one user.
//! The balance is only ever mutated through [`Account::deposit`] and
//! [`Account::withdraw`]: commands rename accounts, domain events move
//! money.

use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::cqrs::Command;
use crate::entity::{AccountId, AggregateRoot, EntityName, UserId};
use crate::errors::{DomainError, DomainResult};
use crate::events::EventSource;
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::{Amount, Name};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A money account (checking, savings, cash, …)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    owner_id: UserId,
    name: Name,
    balance: Decimal,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Account {
    /// Create an account with an initial balance
    pub fn create(owner_id: UserId, name: Name, initial_balance: Decimal) -> DomainResult<Self> {
        if initial_balance < Decimal::ZERO {
            return Err(DomainError::ValidationError(format!(
                "Initial balance must not be negative, got {initial_balance}"
            )));
        }
        Ok(Self {
            id: AccountId::new(),
            owner_id,
            name,
            balance: initial_balance,
            created_at: Utc::now(),
            version: 0,
        })
    }

    /// Rename the account
    pub fn rename(&mut self, name: Name) {
        self.name = name;
    }

    /// Add to the balance
    pub fn deposit(&mut self, amount: &Amount) {
        self.balance += amount.value();
    }

    /// Take from the balance; fails when the balance is insufficient
    pub fn withdraw(&mut self, amount: &Amount) -> DomainResult<()> {
        if self.balance < amount.value() {
            return Err(DomainError::InsufficientFunds {
                balance: self.balance,
                requested: amount.value(),
            });
        }
        self.balance -= amount.value();
        Ok(())
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// The account's name
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// When the account was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Account {
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

impl EntityName for Account {
    const NAME: &'static str = "Account";
}

impl EventSource for Account {}

/// Create a new account
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateAccount {
    /// The owning user
    pub owner_id: Uuid,
    /// Account name
    pub name: String,
    /// Opening balance; must not be negative
    pub initial_balance: Decimal,
}

impl Command for CreateAccount {}

/// Rename an existing account
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateAccount {
    /// New account name
    pub name: String,
}

impl Command for UpdateAccount {}

/// Strategy spec for creating accounts
pub fn account_create_spec() -> CreateSpec<CreateAccount, Account> {
    CreateSpec {
        references: Box::new(|c: &CreateAccount| vec![ForeignRef::new(User::NAME, c.owner_id)]),
        unique_name: None,
        construct: Box::new(|c: &CreateAccount| {
            Account::create(
                UserId::from_uuid(c.owner_id),
                Name::new(c.name.as_str())?,
                c.initial_balance,
            )
        }),
    }
}

/// Strategy spec for updating accounts
pub fn account_update_spec() -> UpdateSpec<UpdateAccount, Account> {
    UpdateSpec {
        references: Box::new(|_| Vec::new()),
        apply: Box::new(|account: &mut Account, c: &UpdateAccount| {
            account.rename(Name::new(c.name.as_str())?);
            Ok(())
        }),
    }
}

/// Account read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AccountView {
    /// Account's unique identifier
    pub account_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Account name
    pub name: String,
    /// Current balance
    pub balance: Decimal,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for AccountView {
    const NAME: &'static str = "Account";
}

impl ListProjection for AccountView {
    fn sortable_columns() -> &'static [&'static str] {
        &["name", "balance", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["name"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("name", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "account_id"
    }
}

/// Project an account into its view
pub fn project_account(account: &Account) -> AccountView {
    AccountView {
        account_id: *account.id().as_uuid(),
        owner_id: *account.owner_id().as_uuid(),
        name: account.name().as_str().to_string(),
        balance: account.balance(),
        created_at: account.created_at(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Amount;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal) -> Account {
        Account::create(UserId::new(), Name::new("Checking").unwrap(), balance).unwrap()
    }

    #[test]
    fn create_rejects_negative_opening_balance() {
        let err = Account::create(
            UserId::new(),
            Name::new("Checking").unwrap(),
            dec!(-1),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn deposit_and_withdraw_move_the_balance() {
        let mut account = account(dec!(100));

        account.deposit(&Amount::new(dec!(50.25)).unwrap());
        assert_eq!(account.balance(), dec!(150.25));

        account.withdraw(&Amount::new(dec!(150)).unwrap()).unwrap();
        assert_eq!(account.balance(), dec!(0.25));
    }

    /// Withdraw fails on insufficient balance and changes nothing
    ///
    /// ```mermaid
    /// graph LR
    ///     A[balance 100] -->|withdraw 150| B[InsufficientFunds]
    ///     B -->|balance still| A
    /// ```
    #[test]
    fn withdraw_rejects_insufficient_funds() {
        let mut account = account(dec!(100));

        let err = account.withdraw(&Amount::new(dec!(150)).unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientFunds { .. }));
        assert_eq!(account.balance(), dec!(100));
    }

    #[test]
    fn withdraw_allows_draining_to_exactly_zero() {
        let mut account = account(dec!(75));
        account.withdraw(&Amount::new(dec!(75)).unwrap()).unwrap();
        assert_eq!(account.balance(), Decimal::ZERO);
    }

    #[test]
    fn projection_carries_all_fields() {
        let account = account(dec!(10));
        let view = project_account(&account);

        assert_eq!(view.account_id, *account.id().as_uuid());
        assert_eq!(view.name, "Checking");
        assert_eq!(view.balance, dec!(10));
    }
}
