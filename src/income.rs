// Copyright 2025 Cowboy AI, LLC.

//! Income aggregate
//!
//! A dated, positive amount received from a client and deposited into an
//! account. Registration raises [`IncomeRegistered`] so the balance handler
//! credits the account; deletion goes through [`Income::mark_deleted`],
//! which raises [`IncomeMarkedDeleted`] to reverse that credit before the
//! row is removed.

use crate::account::Account;
use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::concept::Concept;
use crate::cqrs::Command;
use crate::entity::{
    AccountId, AggregateRoot, ClientId, ConceptId, EntityName, IncomeId, PaymentMethodId,
    PersonId, UserId,
};
use crate::errors::DomainResult;
use crate::events::{DomainEventEnum, EventSource, IncomeMarkedDeleted, IncomeRegistered};
use crate::parties::{Client, PaymentMethod, Person};
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::{Amount, Description};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded income
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    id: IncomeId,
    owner_id: UserId,
    amount: Amount,
    date: NaiveDate,
    concept_id: ConceptId,
    client_id: ClientId,
    person_id: PersonId,
    account_id: AccountId,
    payment_method_id: PaymentMethodId,
    description: Option<Description>,
    created_at: DateTime<Utc>,
    version: u64,
    #[serde(skip)]
    pending_events: Vec<DomainEventEnum>,
}

/// Field bundle shared by [`Income::create`] and [`Income::update`]
#[derive(Debug, Clone)]
pub struct IncomeFields {
    /// Amount received
    pub amount: Amount,
    /// Date of the income
    pub date: NaiveDate,
    /// What the money was received for
    pub concept_id: ConceptId,
    /// Who paid
    pub client_id: ClientId,
    /// Who in the household received it
    pub person_id: PersonId,
    /// Account the money arrived at
    pub account_id: AccountId,
    /// How it was received
    pub payment_method_id: PaymentMethodId,
    /// Optional note
    pub description: Option<Description>,
}

impl Income {
    /// Register an income; raises the deposit event
    pub fn create(owner_id: UserId, fields: IncomeFields) -> Self {
        let id = IncomeId::new();
        let event = DomainEventEnum::IncomeRegistered(IncomeRegistered {
            income_id: id,
            account_id: fields.account_id,
            amount: fields.amount,
        });
        Self {
            id,
            owner_id,
            amount: fields.amount,
            date: fields.date,
            concept_id: fields.concept_id,
            client_id: fields.client_id,
            person_id: fields.person_id,
            account_id: fields.account_id,
            payment_method_id: fields.payment_method_id,
            description: fields.description,
            created_at: Utc::now(),
            version: 0,
            pending_events: vec![event],
        }
    }

    /// Replace the income's recorded fields
    ///
    /// Balances are not re-adjusted on update; only registration and
    /// deletion carry balance effects.
    pub fn update(&mut self, fields: IncomeFields) {
        self.amount = fields.amount;
        self.date = fields.date;
        self.concept_id = fields.concept_id;
        self.client_id = fields.client_id;
        self.person_id = fields.person_id;
        self.account_id = fields.account_id;
        self.payment_method_id = fields.payment_method_id;
        self.description = fields.description;
    }

    /// Mark for deletion; raises the balance-reversal event
    pub fn mark_deleted(&mut self) -> DomainResult<()> {
        self.pending_events
            .push(DomainEventEnum::IncomeMarkedDeleted(IncomeMarkedDeleted {
                income_id: self.id,
                account_id: self.account_id,
                amount: self.amount,
            }));
        Ok(())
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Amount received
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Date of the income
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Account the money arrived at
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Optional note
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// When the income was recorded
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Income {
    type Id = IncomeId;

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

impl EntityName for Income {
    const NAME: &'static str = "Income";
}

impl EventSource for Income {
    fn take_events(&mut self) -> Vec<DomainEventEnum> {
        std::mem::take(&mut self.pending_events)
    }
}

/// Register a new income
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateIncome {
    /// The owning user
    pub owner_id: Uuid,
    /// Amount received; must be positive
    pub amount: Decimal,
    /// Date of the income
    pub date: NaiveDate,
    /// Concept reference
    pub concept_id: Uuid,
    /// Client reference
    pub client_id: Uuid,
    /// Person reference
    pub person_id: Uuid,
    /// Account reference
    pub account_id: Uuid,
    /// Payment-method reference
    pub payment_method_id: Uuid,
    /// Optional note
    pub description: Option<String>,
}

impl Command for CreateIncome {}

/// Update an existing income
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateIncome {
    /// New amount; must be positive
    pub amount: Decimal,
    /// New date
    pub date: NaiveDate,
    /// New concept reference
    pub concept_id: Uuid,
    /// New client reference
    pub client_id: Uuid,
    /// New person reference
    pub person_id: Uuid,
    /// New account reference
    pub account_id: Uuid,
    /// New payment-method reference
    pub payment_method_id: Uuid,
    /// New note
    pub description: Option<String>,
}

impl Command for UpdateIncome {}

fn create_fields(c: &CreateIncome) -> DomainResult<IncomeFields> {
    Ok(IncomeFields {
        amount: Amount::new(c.amount)?,
        date: c.date,
        concept_id: ConceptId::from_uuid(c.concept_id),
        client_id: ClientId::from_uuid(c.client_id),
        person_id: PersonId::from_uuid(c.person_id),
        account_id: AccountId::from_uuid(c.account_id),
        payment_method_id: PaymentMethodId::from_uuid(c.payment_method_id),
        description: Description::opt(c.description.clone())?,
    })
}

fn update_fields(c: &UpdateIncome) -> DomainResult<IncomeFields> {
    Ok(IncomeFields {
        amount: Amount::new(c.amount)?,
        date: c.date,
        concept_id: ConceptId::from_uuid(c.concept_id),
        client_id: ClientId::from_uuid(c.client_id),
        person_id: PersonId::from_uuid(c.person_id),
        account_id: AccountId::from_uuid(c.account_id),
        payment_method_id: PaymentMethodId::from_uuid(c.payment_method_id),
        description: Description::opt(c.description.clone())?,
    })
}

/// Strategy spec for registering incomes
pub fn income_create_spec() -> CreateSpec<CreateIncome, Income> {
    CreateSpec {
        references: Box::new(|c: &CreateIncome| {
            vec![
                ForeignRef::new(User::NAME, c.owner_id),
                ForeignRef::new(Concept::NAME, c.concept_id),
                ForeignRef::new(Client::NAME, c.client_id),
                ForeignRef::new(Person::NAME, c.person_id),
                ForeignRef::new(Account::NAME, c.account_id),
                ForeignRef::new(PaymentMethod::NAME, c.payment_method_id),
            ]
        }),
        unique_name: None,
        construct: Box::new(|c: &CreateIncome| {
            Ok(Income::create(UserId::from_uuid(c.owner_id), create_fields(c)?))
        }),
    }
}

/// Strategy spec for updating incomes
pub fn income_update_spec() -> UpdateSpec<UpdateIncome, Income> {
    UpdateSpec {
        references: Box::new(|c: &UpdateIncome| {
            vec![
                ForeignRef::new(Concept::NAME, c.concept_id),
                ForeignRef::new(Client::NAME, c.client_id),
                ForeignRef::new(Person::NAME, c.person_id),
                ForeignRef::new(Account::NAME, c.account_id),
                ForeignRef::new(PaymentMethod::NAME, c.payment_method_id),
            ]
        }),
        apply: Box::new(|income: &mut Income, c: &UpdateIncome| {
            income.update(update_fields(c)?);
            Ok(())
        }),
    }
}

/// Income read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IncomeView {
    /// Income's unique identifier
    pub income_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Amount received
    pub amount: Decimal,
    /// Date of the income
    pub date: NaiveDate,
    /// Concept reference
    pub concept_id: Uuid,
    /// Client reference
    pub client_id: Uuid,
    /// Person reference
    pub person_id: Uuid,
    /// Account reference
    pub account_id: Uuid,
    /// Payment-method reference
    pub payment_method_id: Uuid,
    /// Optional note
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for IncomeView {
    const NAME: &'static str = "Income";
}

impl ListProjection for IncomeView {
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
        "income_id"
    }
}

/// Project an income into its view
pub fn project_income(income: &Income) -> IncomeView {
    IncomeView {
        income_id: *income.id.as_uuid(),
        owner_id: *income.owner_id.as_uuid(),
        amount: income.amount.value(),
        date: income.date,
        concept_id: *income.concept_id.as_uuid(),
        client_id: *income.client_id.as_uuid(),
        person_id: *income.person_id.as_uuid(),
        account_id: *income.account_id.as_uuid(),
        payment_method_id: *income.payment_method_id.as_uuid(),
        description: income.description.as_ref().map(|d| d.as_str().to_string()),
        created_at: income.created_at,
    }
}
