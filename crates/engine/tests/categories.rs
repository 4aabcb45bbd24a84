mod common;

use engine::{EngineError, TransactionKind};

use common::{engine_with_user, entry};

#[tokio::test]
async fn names_merge_defaults_with_user_categories() {
    let (engine, user) = engine_with_user().await;
    engine.create_category(&user.id, "Rent").await.unwrap();
    engine.create_category(&user.id, "food").await.unwrap();

    let names = engine.category_names(&user.id).await.unwrap();
    assert_eq!(
        names,
        vec!["Bills", "Entertainment", "Food", "Other", "Rent", "Transport"]
    );
}

#[tokio::test]
async fn duplicate_category_is_rejected() {
    let (engine, user) = engine_with_user().await;
    engine.create_category(&user.id, "Eating Out").await.unwrap();
    let err = engine
        .create_category(&user.id, "  eating   out ")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("eating out".to_string()));
    assert!(matches!(
        engine.create_category(&user.id, "   ").await,
        Err(EngineError::InvalidName(_))
    ));
}

#[tokio::test]
async fn categories_are_per_user() {
    let (engine, alice) = engine_with_user().await;
    let bob = engine.sign_up("bob", "bob@example.com", "pw").await.unwrap();
    engine.create_category(&alice.id, "Rent").await.unwrap();
    engine.create_category(&bob.id, "Rent").await.unwrap();

    assert_eq!(engine.list_categories(&alice.id).await.unwrap().len(), 1);
    assert_eq!(engine.list_categories(&bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn category_id_falls_back_to_name() {
    let (engine, user) = engine_with_user().await;
    let rent = engine.create_category(&user.id, "Rent").await.unwrap();

    assert_eq!(engine.resolve_category_id(&user.id, "rent").await.unwrap(), rent.id);
    assert_eq!(engine.resolve_category_id(&user.id, " Food ").await.unwrap(), "Food");

    let expense = engine
        .create_expense(&user.id, entry("Rent", TransactionKind::Expense, "100", "01/06/2025"))
        .await
        .unwrap();
    assert_eq!(expense.category_id, rent.id);
}
