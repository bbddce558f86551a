//! End-to-end command/query pipeline scenarios over the in-memory backend.

mod common;

use common::Backend;
use fintrack_domain::*;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn create_then_get_by_id_round_trips() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    let id = backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Food".into(),
                description: Some("eating out and groceries".into()),
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();

    let view = backend
        .category_queries()
        .get_by_id(backend.query(GetById { id: *id.as_uuid() }))
        .await
        .unwrap();

    assert_eq!(view.category_id, *id.as_uuid());
    assert_eq!(view.owner_id, owner);
    assert_eq!(view.name, "Food");
    assert_eq!(view.description.as_deref(), Some("eating out and groceries"));
}

#[tokio::test]
async fn duplicate_category_name_conflicts_per_owner() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Food".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();

    // Same owner, same name: Conflict
    let err = backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Food".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Conflict);
    assert_eq!(backend.categories.count().await, 1);

    // Another owner may reuse the name
    let other_owner = backend
        .user_commands()
        .create(
            backend.envelope(CreateUser {
                name: "Second".into(),
                email: "second@example.com".into(),
            }),
            &user_create_spec(),
        )
        .await
        .unwrap();
    backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: *other_owner.as_uuid(),
                name: "Food".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn dangling_category_reference_is_not_found_and_persists_nothing() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    let err = backend
        .concept_commands()
        .create(
            backend.envelope(CreateConcept {
                owner_id: owner,
                name: "Groceries2".into(),
                category_id: Uuid::new_v4(),
            }),
            &concept_create_spec(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::NotFound);
    assert_eq!(backend.concepts.count().await, 0);
    assert_eq!(backend.unit_of_work.commit_count(), 1); // only the seeded user
}

#[tokio::test]
async fn concept_under_existing_category_succeeds() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;
    let refs = backend.seed_refs(owner).await;

    let id = backend
        .concept_commands()
        .create(
            backend.envelope(CreateConcept {
                owner_id: owner,
                name: "Groceries".into(),
                category_id: refs.category_id,
            }),
            &concept_create_spec(),
        )
        .await
        .unwrap();

    assert!(backend.concepts.find(id).await.unwrap().is_some());
}

/// After Update(id), GetById(id) must reflect the new value even though the
/// old value was cached: invalidation, not TTL expiry.
#[tokio::test]
async fn update_invalidates_the_cached_view()  {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    let id = backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Trvel".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();

    // Prime the cache with the misspelled name
    let cached = backend
        .category_queries()
        .get_by_id(backend.query(GetById { id: *id.as_uuid() }))
        .await
        .unwrap();
    assert_eq!(cached.name, "Trvel");

    backend
        .category_commands()
        .update(
            id,
            backend.envelope(UpdateCategory {
                name: "Travel".into(),
                description: None,
            }),
            &category_update_spec(),
        )
        .await
        .unwrap();

    let fresh = backend
        .category_queries()
        .get_by_id(backend.query(GetById { id: *id.as_uuid() }))
        .await
        .unwrap();
    assert_eq!(fresh.name, "Travel");
}

#[tokio::test]
async fn update_with_invalid_name_is_validation_and_changes_nothing() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    let id = backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Bills".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();

    let err = backend
        .category_commands()
        .update(
            id,
            backend.envelope(UpdateCategory {
                name: "   ".into(),
                description: None,
            }),
            &category_update_spec(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Validation);
    let stored = backend.categories.find(id).await.unwrap().unwrap();
    assert_eq!(stored.name().as_str(), "Bills");
}

#[tokio::test]
async fn delete_twice_reports_not_found_both_times() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;

    let id = backend
        .category_commands()
        .create(
            backend.envelope(CreateCategory {
                owner_id: owner,
                name: "Ephemeral".into(),
                description: None,
            }),
            &category_create_spec(),
        )
        .await
        .unwrap();

    backend.category_commands().delete(id).await.unwrap();

    let first = backend.category_commands().delete(id).await.unwrap_err();
    let second = backend.category_commands().delete(id).await.unwrap_err();
    assert!(first.is_not_found());
    assert!(second.is_not_found());
}

#[tokio::test]
async fn transfer_and_scheduled_rules_reject_in_place_updates() {
    assert_eq!(
        transfer_update_rejected().kind(),
        FailureKind::Validation
    );
    assert!(matches!(
        scheduled_expense_update_rejected(),
        DomainError::UnsupportedOperation { entity_type: "ScheduledExpense", .. }
    ));
    assert!(matches!(
        scheduled_income_update_rejected(),
        DomainError::UnsupportedOperation { entity_type: "ScheduledIncome", .. }
    ));
}

#[tokio::test]
async fn scheduled_expense_persists_a_generated_job_id() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;
    let refs = backend.seed_refs(owner).await;
    let account_id = backend.seed_account(owner, "Checking", dec!(0)).await;

    let scheduled = std::sync::Arc::new(InMemoryRepository::<ScheduledExpense>::new());
    let pipeline = CommandPipeline::new(
        scheduled.clone(),
        backend.validator.clone(),
        backend.cache.clone(),
        backend.dispatcher.clone(),
        backend.unit_of_work.clone(),
    );

    let id = pipeline
        .create(
            backend.envelope(CreateScheduledExpense {
                owner_id: owner,
                amount: dec!(15.99),
                frequency: Frequency::Monthly,
                next_execution: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                concept_id: refs.concept_id,
                payee_id: refs.payee_id,
                person_id: refs.person_id,
                account_id,
                payment_method_id: refs.payment_method_id,
            }),
            &scheduled_expense_create_spec(std::sync::Arc::new(UuidJobScheduler::new())),
        )
        .await
        .unwrap();

    let rule = scheduled.find(id).await.unwrap().unwrap();
    assert!(rule.job_id().starts_with("job-"));
    assert!(rule.is_active());
}

#[tokio::test]
async fn expense_with_all_references_round_trips() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;
    let refs = backend.seed_refs(owner).await;
    let account_id = backend.seed_account(owner, "Checking", dec!(100)).await;

    let id = backend
        .expense_commands()
        .create(
            backend.envelope(CreateExpense {
                owner_id: owner,
                amount: dec!(42.10),
                date: chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                concept_id: refs.concept_id,
                payee_id: refs.payee_id,
                person_id: refs.person_id,
                account_id,
                payment_method_id: refs.payment_method_id,
                description: Some("lunch".into()),
            }),
            &expense_create_spec(),
        )
        .await
        .unwrap();

    let view = backend
        .expense_queries()
        .get_by_id(backend.query(GetById { id: *id.as_uuid() }))
        .await
        .unwrap();

    assert_eq!(view.amount, dec!(42.10));
    assert_eq!(view.account_id, account_id);
    assert_eq!(view.description.as_deref(), Some("lunch"));
}

#[tokio::test]
async fn expense_with_missing_payment_method_is_not_found() {
    let backend = Backend::new();
    let owner = backend.seed_user().await;
    let refs = backend.seed_refs(owner).await;
    let account_id = backend.seed_account(owner, "Checking", dec!(100)).await;

    let err = backend
        .expense_commands()
        .create(
            backend.envelope(CreateExpense {
                owner_id: owner,
                amount: dec!(10),
                date: chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                concept_id: refs.concept_id,
                payee_id: refs.payee_id,
                person_id: refs.person_id,
                account_id,
                payment_method_id: Uuid::new_v4(),
                description: None,
            }),
            &expense_create_spec(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    // The failure names the missing reference
    assert!(err.to_string().contains("PaymentMethod"));
    assert_eq!(backend.expenses.count().await, 0);
}
