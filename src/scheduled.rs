// Copyright 2025 Cowboy AI, LLC.

//! Scheduled recurring transactions
//!
//! Scheduled expenses and incomes persist the metadata of a recurring rule:
//! frequency, next execution date, the references of their one-shot
//! counterparts, and the identifier of the externally scheduled job. Actual
//! recurring execution is the external scheduler's job; this module only
//! generates and stores the identifier. Like transfers, scheduled rules are
//! never edited in place; rescheduling means delete and recreate.

use crate::account::Account;
use crate::command_handlers::CreateSpec;
use crate::concept::Concept;
use crate::cqrs::Command;
use crate::entity::{
    AccountId, AggregateRoot, ClientId, ConceptId, EntityName, PayeeId, PaymentMethodId,
    PersonId, ScheduledExpenseId, ScheduledIncomeId, UserId,
};
use crate::errors::DomainError;
use crate::events::EventSource;
use crate::parties::{Client, Payee, PaymentMethod, Person};
use crate::read_model::{ListProjection, SortDirection};
use crate::scheduling::JobScheduler;
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// How often a scheduled rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day
    Daily,
    /// Every week
    Weekly,
    /// Every month
    Monthly,
    /// Every year
    Yearly,
}

/// A recurring expense rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledExpense {
    id: ScheduledExpenseId,
    owner_id: UserId,
    amount: Amount,
    frequency: Frequency,
    next_execution: NaiveDate,
    concept_id: ConceptId,
    payee_id: PayeeId,
    person_id: PersonId,
    account_id: AccountId,
    payment_method_id: PaymentMethodId,
    job_id: String,
    active: bool,
    created_at: DateTime<Utc>,
    version: u64,
}

impl ScheduledExpense {
    /// Create a recurring expense rule with an externally generated job id
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        owner_id: UserId,
        amount: Amount,
        frequency: Frequency,
        next_execution: NaiveDate,
        concept_id: ConceptId,
        payee_id: PayeeId,
        person_id: PersonId,
        account_id: AccountId,
        payment_method_id: PaymentMethodId,
        job_id: String,
    ) -> Self {
        Self {
            id: ScheduledExpenseId::new(),
            owner_id,
            amount,
            frequency,
            next_execution,
            concept_id,
            payee_id,
            person_id,
            account_id,
            payment_method_id,
            job_id,
            active: true,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Resume the rule
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Pause the rule without deleting its metadata
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Amount per occurrence
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Recurrence frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Next execution date
    pub fn next_execution(&self) -> NaiveDate {
        self.next_execution
    }

    /// Identifier of the external recurring job
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Whether the rule is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the rule was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for ScheduledExpense {
    type Id = ScheduledExpenseId;

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

impl EntityName for ScheduledExpense {
    const NAME: &'static str = "ScheduledExpense";
}

impl EventSource for ScheduledExpense {}

/// A recurring income rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledIncome {
    id: ScheduledIncomeId,
    owner_id: UserId,
    amount: Amount,
    frequency: Frequency,
    next_execution: NaiveDate,
    concept_id: ConceptId,
    client_id: ClientId,
    person_id: PersonId,
    account_id: AccountId,
    payment_method_id: PaymentMethodId,
    job_id: String,
    active: bool,
    created_at: DateTime<Utc>,
    version: u64,
}

impl ScheduledIncome {
    /// Create a recurring income rule with an externally generated job id
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        owner_id: UserId,
        amount: Amount,
        frequency: Frequency,
        next_execution: NaiveDate,
        concept_id: ConceptId,
        client_id: ClientId,
        person_id: PersonId,
        account_id: AccountId,
        payment_method_id: PaymentMethodId,
        job_id: String,
    ) -> Self {
        Self {
            id: ScheduledIncomeId::new(),
            owner_id,
            amount,
            frequency,
            next_execution,
            concept_id,
            client_id,
            person_id,
            account_id,
            payment_method_id,
            job_id,
            active: true,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Resume the rule
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Pause the rule without deleting its metadata
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Amount per occurrence
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Recurrence frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Next execution date
    pub fn next_execution(&self) -> NaiveDate {
        self.next_execution
    }

    /// Identifier of the external recurring job
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Whether the rule is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// When the rule was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for ScheduledIncome {
    type Id = ScheduledIncomeId;

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

impl EntityName for ScheduledIncome {
    const NAME: &'static str = "ScheduledIncome";
}

impl EventSource for ScheduledIncome {}

/// Create a new recurring expense rule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateScheduledExpense {
    /// The owning user
    pub owner_id: Uuid,
    /// Amount per occurrence; must be positive
    pub amount: Decimal,
    /// Recurrence frequency
    pub frequency: Frequency,
    /// First/next execution date
    pub next_execution: NaiveDate,
    /// Concept reference
    pub concept_id: Uuid,
    /// Payee reference
    pub payee_id: Uuid,
    /// Person reference
    pub person_id: Uuid,
    /// Account reference
    pub account_id: Uuid,
    /// Payment-method reference
    pub payment_method_id: Uuid,
}

impl Command for CreateScheduledExpense {}

/// Create a new recurring income rule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateScheduledIncome {
    /// The owning user
    pub owner_id: Uuid,
    /// Amount per occurrence; must be positive
    pub amount: Decimal,
    /// Recurrence frequency
    pub frequency: Frequency,
    /// First/next execution date
    pub next_execution: NaiveDate,
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
}

impl Command for CreateScheduledIncome {}

/// Strategy spec for creating recurring expense rules
///
/// The job id is obtained from the scheduler at construction time and
/// persisted with the rule.
pub fn scheduled_expense_create_spec(
    scheduler: Arc<dyn JobScheduler>,
) -> CreateSpec<CreateScheduledExpense, ScheduledExpense> {
    CreateSpec {
        references: Box::new(|c: &CreateScheduledExpense| {
            vec![
                ForeignRef::new(User::NAME, c.owner_id),
                ForeignRef::new(Concept::NAME, c.concept_id),
                ForeignRef::new(Payee::NAME, c.payee_id),
                ForeignRef::new(Person::NAME, c.person_id),
                ForeignRef::new(Account::NAME, c.account_id),
                ForeignRef::new(PaymentMethod::NAME, c.payment_method_id),
            ]
        }),
        unique_name: None,
        construct: Box::new(move |c: &CreateScheduledExpense| {
            Ok(ScheduledExpense::create(
                UserId::from_uuid(c.owner_id),
                Amount::new(c.amount)?,
                c.frequency,
                c.next_execution,
                ConceptId::from_uuid(c.concept_id),
                PayeeId::from_uuid(c.payee_id),
                PersonId::from_uuid(c.person_id),
                AccountId::from_uuid(c.account_id),
                PaymentMethodId::from_uuid(c.payment_method_id),
                scheduler.generate_job_id(),
            ))
        }),
    }
}

/// Strategy spec for creating recurring income rules
pub fn scheduled_income_create_spec(
    scheduler: Arc<dyn JobScheduler>,
) -> CreateSpec<CreateScheduledIncome, ScheduledIncome> {
    CreateSpec {
        references: Box::new(|c: &CreateScheduledIncome| {
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
        construct: Box::new(move |c: &CreateScheduledIncome| {
            Ok(ScheduledIncome::create(
                UserId::from_uuid(c.owner_id),
                Amount::new(c.amount)?,
                c.frequency,
                c.next_execution,
                ConceptId::from_uuid(c.concept_id),
                ClientId::from_uuid(c.client_id),
                PersonId::from_uuid(c.person_id),
                AccountId::from_uuid(c.account_id),
                PaymentMethodId::from_uuid(c.payment_method_id),
                scheduler.generate_job_id(),
            ))
        }),
    }
}

/// In-place rescheduling is deliberately unsupported; callers delete and
/// recreate instead
pub fn scheduled_expense_update_rejected() -> DomainError {
    DomainError::UnsupportedOperation {
        entity_type: ScheduledExpense::NAME,
        operation: "update",
    }
}

/// In-place rescheduling is deliberately unsupported; callers delete and
/// recreate instead
pub fn scheduled_income_update_rejected() -> DomainError {
    DomainError::UnsupportedOperation {
        entity_type: ScheduledIncome::NAME,
        operation: "update",
    }
}

/// Scheduled-expense read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScheduledExpenseView {
    /// Rule's unique identifier
    pub scheduled_expense_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Amount per occurrence
    pub amount: Decimal,
    /// Recurrence frequency
    pub frequency: Frequency,
    /// Next execution date
    pub next_execution: NaiveDate,
    /// External job identifier
    pub job_id: String,
    /// Whether the rule is active
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for ScheduledExpenseView {
    const NAME: &'static str = "ScheduledExpense";
}

impl ListProjection for ScheduledExpenseView {
    fn sortable_columns() -> &'static [&'static str] {
        &["next_execution", "amount", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["amount", "next_execution"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("next_execution", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "scheduled_expense_id"
    }
}

/// Project a scheduled expense into its view
pub fn project_scheduled_expense(rule: &ScheduledExpense) -> ScheduledExpenseView {
    ScheduledExpenseView {
        scheduled_expense_id: *rule.id.as_uuid(),
        owner_id: *rule.owner_id.as_uuid(),
        amount: rule.amount.value(),
        frequency: rule.frequency,
        next_execution: rule.next_execution,
        job_id: rule.job_id.clone(),
        active: rule.active,
        created_at: rule.created_at,
    }
}

/// Scheduled-income read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScheduledIncomeView {
    /// Rule's unique identifier
    pub scheduled_income_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Amount per occurrence
    pub amount: Decimal,
    /// Recurrence frequency
    pub frequency: Frequency,
    /// Next execution date
    pub next_execution: NaiveDate,
    /// External job identifier
    pub job_id: String,
    /// Whether the rule is active
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for ScheduledIncomeView {
    const NAME: &'static str = "ScheduledIncome";
}

impl ListProjection for ScheduledIncomeView {
    fn sortable_columns() -> &'static [&'static str] {
        &["next_execution", "amount", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        &["amount", "next_execution"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("next_execution", SortDirection::Ascending)
    }

    fn id_column() -> &'static str {
        "scheduled_income_id"
    }
}

/// Project a scheduled income into its view
pub fn project_scheduled_income(rule: &ScheduledIncome) -> ScheduledIncomeView {
    ScheduledIncomeView {
        scheduled_income_id: *rule.id.as_uuid(),
        owner_id: *rule.owner_id.as_uuid(),
        amount: rule.amount.value(),
        frequency: rule.frequency,
        next_execution: rule.next_execution,
        job_id: rule.job_id.clone(),
        active: rule.active,
        created_at: rule.created_at,
    }
}
