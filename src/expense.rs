// Copyright 2025 Cowboy AI, LLC.

//! Expense aggregate
//!
//! A dated, positive amount paid to a payee, classified by concept and
//! payment method, drawn against an account. Every foreign reference is
//! validated before anything persists.

use crate::account::Account;
use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::concept::Concept;
use crate::cqrs::Command;
use crate::entity::{
    AccountId, AggregateRoot, ConceptId, EntityName, ExpenseId, PayeeId, PaymentMethodId,
    PersonId, UserId,
};
use crate::errors::DomainResult;
use crate::events::EventSource;
use crate::parties::{Payee, PaymentMethod, Person};
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::ForeignRef;
use crate::value_objects::{Amount, Description};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    owner_id: UserId,
    amount: Amount,
    date: NaiveDate,
    concept_id: ConceptId,
    payee_id: PayeeId,
    person_id: PersonId,
    account_id: AccountId,
    payment_method_id: PaymentMethodId,
    description: Option<Description>,
    created_at: DateTime<Utc>,
    version: u64,
}

/// Field bundle shared by [`Expense::create`] and [`Expense::update`]
#[derive(Debug, Clone)]
pub struct ExpenseFields {
    /// Amount spent
    pub amount: Amount,
    /// Date of the expense
    pub date: NaiveDate,
    /// What the money was spent on
    pub concept_id: ConceptId,
    /// Who was paid
    pub payee_id: PayeeId,
    /// Who in the household spent it
    pub person_id: PersonId,
    /// Account the money left
    pub account_id: AccountId,
    /// How it was paid
    pub payment_method_id: PaymentMethodId,
    /// Optional note
    pub description: Option<Description>,
}

impl Expense {
    /// Record an expense
    pub fn create(owner_id: UserId, fields: ExpenseFields) -> Self {
        Self {
            id: ExpenseId::new(),
            owner_id,
            amount: fields.amount,
            date: fields.date,
            concept_id: fields.concept_id,
            payee_id: fields.payee_id,
            person_id: fields.person_id,
            account_id: fields.account_id,
            payment_method_id: fields.payment_method_id,
            description: fields.description,
            created_at: Utc::now(),
            version: 0,
        }
    }

    /// Replace the expense's recorded fields
    pub fn update(&mut self, fields: ExpenseFields) {
        self.amount = fields.amount;
        self.date = fields.date;
        self.concept_id = fields.concept_id;
        self.payee_id = fields.payee_id;
        self.person_id = fields.person_id;
        self.account_id = fields.account_id;
        self.payment_method_id = fields.payment_method_id;
        self.description = fields.description;
    }

    /// The owning user
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Amount spent
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Date of the expense
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Account the money left
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Optional note
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// When the expense was recorded
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for Expense {
    type Id = ExpenseId;

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

impl EntityName for Expense {
    const NAME: &'static str = "Expense";
}

impl EventSource for Expense {}

/// Record a new expense
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateExpense {
    /// The owning user
    pub owner_id: Uuid,
    /// Amount spent; must be positive
    pub amount: Decimal,
    /// Date of the expense
    pub date: NaiveDate,
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
    /// Optional note
    pub description: Option<String>,
}

impl Command for CreateExpense {}

/// Update an existing expense
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateExpense {
    /// New amount; must be positive
    pub amount: Decimal,
    /// New date
    pub date: NaiveDate,
    /// New concept reference
    pub concept_id: Uuid,
    /// New payee reference
    pub payee_id: Uuid,
    /// New person reference
    pub person_id: Uuid,
    /// New account reference
    pub account_id: Uuid,
    /// New payment-method reference
    pub payment_method_id: Uuid,
    /// New note
    pub description: Option<String>,
}

impl Command for UpdateExpense {}

fn create_fields(c: &CreateExpense) -> DomainResult<ExpenseFields> {
    Ok(ExpenseFields {
        amount: Amount::new(c.amount)?,
        date: c.date,
        concept_id: ConceptId::from_uuid(c.concept_id),
        payee_id: PayeeId::from_uuid(c.payee_id),
        person_id: PersonId::from_uuid(c.person_id),
        account_id: AccountId::from_uuid(c.account_id),
        payment_method_id: PaymentMethodId::from_uuid(c.payment_method_id),
        description: Description::opt(c.description.clone())?,
    })
}

fn update_fields(c: &UpdateExpense) -> DomainResult<ExpenseFields> {
    Ok(ExpenseFields {
        amount: Amount::new(c.amount)?,
        date: c.date,
        concept_id: ConceptId::from_uuid(c.concept_id),
        payee_id: PayeeId::from_uuid(c.payee_id),
        person_id: PersonId::from_uuid(c.person_id),
        account_id: AccountId::from_uuid(c.account_id),
        payment_method_id: PaymentMethodId::from_uuid(c.payment_method_id),
        description: Description::opt(c.description.clone())?,
    })
}

/// Strategy spec for recording expenses
pub fn expense_create_spec() -> CreateSpec<CreateExpense, Expense> {
    CreateSpec {
        references: Box::new(|c: &CreateExpense| {
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
        construct: Box::new(|c: &CreateExpense| {
            Ok(Expense::create(UserId::from_uuid(c.owner_id), create_fields(c)?))
        }),
    }
}

/// Strategy spec for updating expenses
pub fn expense_update_spec() -> UpdateSpec<UpdateExpense, Expense> {
    UpdateSpec {
        references: Box::new(|c: &UpdateExpense| {
            vec![
                ForeignRef::new(Concept::NAME, c.concept_id),
                ForeignRef::new(Payee::NAME, c.payee_id),
                ForeignRef::new(Person::NAME, c.person_id),
                ForeignRef::new(Account::NAME, c.account_id),
                ForeignRef::new(PaymentMethod::NAME, c.payment_method_id),
            ]
        }),
        apply: Box::new(|expense: &mut Expense, c: &UpdateExpense| {
            expense.update(update_fields(c)?);
            Ok(())
        }),
    }
}

/// Expense read-model projection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseView {
    /// Expense's unique identifier
    pub expense_id: Uuid,
    /// The owning user
    pub owner_id: Uuid,
    /// Amount spent
    pub amount: Decimal,
    /// Date of the expense
    pub date: NaiveDate,
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
    /// Optional note
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EntityName for ExpenseView {
    const NAME: &'static str = "Expense";
}

impl ListProjection for ExpenseView {
    fn sortable_columns() -> &'static [&'static str] {
        &["date", "amount", "created_at"]
    }

    fn searchable_columns() -> &'static [&'static str] {
        // Declared numeric/date columns participate in free-text search
        &["description", "amount", "date"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("date", SortDirection::Descending)
    }

    fn id_column() -> &'static str {
        "expense_id"
    }
}

/// Project an expense into its view
pub fn project_expense(expense: &Expense) -> ExpenseView {
    ExpenseView {
        expense_id: *expense.id.as_uuid(),
        owner_id: *expense.owner_id.as_uuid(),
        amount: expense.amount.value(),
        date: expense.date,
        concept_id: *expense.concept_id.as_uuid(),
        payee_id: *expense.payee_id.as_uuid(),
        person_id: *expense.person_id.as_uuid(),
        account_id: *expense.account_id.as_uuid(),
        payment_method_id: *expense.payment_method_id.as_uuid(),
        description: expense.description.as_ref().map(|d| d.as_str().to_string()),
        created_at: expense.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fields(amount: Decimal) -> ExpenseFields {
        ExpenseFields {
            amount: Amount::new(amount).unwrap(),
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            concept_id: ConceptId::new(),
            payee_id: PayeeId::new(),
            person_id: PersonId::new(),
            account_id: AccountId::new(),
            payment_method_id: PaymentMethodId::new(),
            description: None,
        }
    }

    #[test]
    fn update_replaces_every_field() {
        let mut expense = Expense::create(UserId::new(), fields(dec!(10)));
        let replacement = fields(dec!(99.99));
        let new_account = replacement.account_id;

        expense.update(replacement);

        assert_eq!(expense.amount().value(), dec!(99.99));
        assert_eq!(expense.account_id(), new_account);
    }

    #[test]
    fn create_spec_lists_all_six_references() {
        let spec = expense_create_spec();
        let command = CreateExpense {
            owner_id: Uuid::new_v4(),
            amount: dec!(5),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            concept_id: Uuid::new_v4(),
            payee_id: Uuid::new_v4(),
            person_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            payment_method_id: Uuid::new_v4(),
            description: None,
        };

        let refs = (spec.references)(&command);
        let types: Vec<&str> = refs.iter().map(|r| r.entity_type).collect();
        assert_eq!(
            types,
            vec!["User", "Concept", "Payee", "Person", "Account", "PaymentMethod"]
        );
    }

    #[test]
    fn construct_rejects_non_positive_amounts() {
        let spec = expense_create_spec();
        let command = CreateExpense {
            owner_id: Uuid::new_v4(),
            amount: dec!(0),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            concept_id: Uuid::new_v4(),
            payee_id: Uuid::new_v4(),
            person_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            payment_method_id: Uuid::new_v4(),
            description: None,
        };

        let err = (spec.construct)(&command).unwrap_err();
        assert!(err.is_validation());
    }
}
