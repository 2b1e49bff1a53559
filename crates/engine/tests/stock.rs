mod common;

use common::{count_rows, deposit, engine_with_db, quantity};
use engine::{DepositCmd, EngineError, ProductType, StockFilter, WithdrawCmd, Withdrawal};

#[tokio::test]
async fn deposit_fills_fridge_exactly_then_rejects_overflow() {
    let (engine, db) = engine_with_db().await;

    let entry = deposit(&engine, "alice", "f1", "Rice", 1, 100).await;
    assert_eq!(entry.quantity, 100);
    assert!(!engine.has_capacity("f1", 1).await.unwrap());

    let err = engine
        .deposit(DepositCmd::product(
            "bob",
            "f1",
            "Beans",
            ProductType::Food,
            1,
            1,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CapacityExceeded(_)));

    // The refused product triple is not kept either.
    assert_eq!(count_rows(&db, "products").await, 1);
    assert_eq!(count_rows(&db, "stock").await, 1);
}

#[tokio::test]
async fn capacity_counts_every_owner() {
    let (engine, db) = engine_with_db().await;

    let rice = deposit(&engine, "alice", "f1", "Rice", 10, 6).await;
    deposit(&engine, "bob", "f1", "Soda", 5, 7).await;

    let usage = engine.fridge_usage("f1").await.unwrap();
    assert_eq!(usage.used, 95);
    assert_eq!(usage.free, 5);

    let err = engine
        .deposit(DepositCmd::new("alice", "f1", rice.product.id.clone(), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CapacityExceeded(_)));
    assert_eq!(quantity(&db, &rice.product.id, "f1", "alice").await, Some(6));

    // Another fridge has its own budget.
    let entry = engine
        .deposit(DepositCmd::new("alice", "f2", rice.product.id.clone(), 5))
        .await
        .unwrap();
    assert_eq!(entry.quantity, 5);
}

#[tokio::test]
async fn same_triple_reuses_product_and_increments() {
    let (engine, db) = engine_with_db().await;

    let first = deposit(&engine, "alice", "f1", "Milk", 2, 3).await;
    let second = deposit(&engine, "alice", "f1", "  Milk ", 2, 4).await;

    assert_eq!(first.product.id, second.product.id);
    assert_eq!(second.quantity, 7);
    assert_eq!(count_rows(&db, "products").await, 1);
    assert_eq!(count_rows(&db, "stock").await, 1);

    // A different size is a different product.
    let third = deposit(&engine, "alice", "f1", "Milk", 1, 1).await;
    assert_ne!(first.product.id, third.product.id);
    assert_eq!(count_rows(&db, "products").await, 2);
}

#[tokio::test]
async fn deposit_requires_user_fridge_and_positive_amount() {
    let (engine, db) = engine_with_db().await;

    let err = engine
        .deposit(DepositCmd::product("ghost", "f1", "Egg", ProductType::Food, 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));

    let err = engine
        .deposit(DepositCmd::product("alice", "nope", "Egg", ProductType::Food, 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("fridge not exists".to_string()));

    let err = engine
        .deposit(DepositCmd::product("alice", "f1", "Egg", ProductType::Food, 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .deposit(DepositCmd::new("alice", "f1", "missing-product", 1))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product not exists".to_string()));

    assert_eq!(count_rows(&db, "products").await, 0);
}

#[tokio::test]
async fn withdraw_exact_amount_deletes_row() {
    let (engine, db) = engine_with_db().await;
    let entry = deposit(&engine, "alice", "f1", "Apple", 1, 5).await;

    let outcome = engine
        .withdraw(WithdrawCmd::new("alice", "f1", entry.product.id.clone(), 5))
        .await
        .unwrap();
    assert_eq!(outcome, Withdrawal::Cleared);
    assert_eq!(quantity(&db, &entry.product.id, "f1", "alice").await, None);
}

#[tokio::test]
async fn withdraw_less_than_held_decrements() {
    let (engine, db) = engine_with_db().await;
    let entry = deposit(&engine, "alice", "f1", "Apple", 1, 5).await;

    let outcome = engine
        .withdraw(WithdrawCmd::new("alice", "f1", entry.product.id.clone(), 4))
        .await
        .unwrap();
    assert_eq!(outcome, Withdrawal::Reduced { remaining: 1 });
    assert_eq!(quantity(&db, &entry.product.id, "f1", "alice").await, Some(1));
}

#[tokio::test]
async fn over_withdraw_is_absorbed() {
    let (engine, db) = engine_with_db().await;
    let entry = deposit(&engine, "alice", "f1", "Apple", 1, 5).await;

    let outcome = engine
        .withdraw(WithdrawCmd::new("alice", "f1", entry.product.id.clone(), 6))
        .await
        .unwrap();
    assert_eq!(outcome, Withdrawal::Cleared);
    assert_eq!(count_rows(&db, "stock").await, 0);

    // Nothing left: the next withdrawal has no row to act on.
    let err = engine
        .withdraw(WithdrawCmd::new("alice", "f1", entry.product.id.clone(), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn withdraw_only_touches_own_row() {
    let (engine, db) = engine_with_db().await;
    let alice = deposit(&engine, "alice", "f1", "Apple", 1, 5).await;
    deposit(&engine, "bob", "f1", "Apple", 1, 5).await;

    engine
        .withdraw(WithdrawCmd::new("alice", "f1", alice.product.id.clone(), 5))
        .await
        .unwrap();
    assert_eq!(quantity(&db, &alice.product.id, "f1", "bob").await, Some(5));
}

#[tokio::test]
async fn clear_user_scopes_to_fridge() {
    let (engine, db) = engine_with_db().await;
    deposit(&engine, "alice", "f1", "Apple", 1, 1).await;
    deposit(&engine, "alice", "f1", "Pear", 1, 1).await;
    deposit(&engine, "alice", "f2", "Apple", 1, 1).await;
    deposit(&engine, "bob", "f1", "Apple", 1, 1).await;

    assert_eq!(engine.clear_user("alice", Some("f1")).await.unwrap(), 2);
    assert_eq!(count_rows(&db, "stock").await, 2);

    assert_eq!(engine.clear_user("alice", None).await.unwrap(), 1);
    assert_eq!(count_rows(&db, "stock").await, 1);

    let err = engine.clear_user("alice", None).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("no products to clear".to_string())
    );

    let err = engine.clear_user("bob", Some("nope")).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("fridge not exists".to_string()));
}

#[tokio::test]
async fn list_for_user_filters_and_explains_empty_results() {
    let (engine, _db) = engine_with_db().await;
    deposit(&engine, "alice", "f1", "Apple", 1, 2).await;
    deposit(&engine, "alice", "f2", "Pear", 1, 3).await;

    let all = engine
        .list_for_user("alice", &StockFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].fridge_id, "f1");
    assert_eq!(all[1].fridge_id, "f2");

    let in_f2 = engine
        .list_for_user("alice", &StockFilter::default().fridge("f2"))
        .await
        .unwrap();
    assert_eq!(in_f2.len(), 1);
    assert_eq!(in_f2[0].product.name, "Pear");

    let at_one = engine
        .list_for_user("alice", &StockFilter::default().location(1))
        .await
        .unwrap();
    assert_eq!(at_one.len(), 1);
    assert_eq!(at_one[0].product.name, "Apple");

    let err = engine
        .list_for_user("alice", &StockFilter::default().location(9))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("no products found in fridge at location: 9".to_string())
    );

    let err = engine
        .list_for_user("bob", &StockFilter::default().fridge("f1"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("no products found in this fridge".to_string())
    );

    let err = engine
        .list_for_user("alice", &StockFilter::default().fridge("nope"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("fridge not exists".to_string()));
}

#[tokio::test]
async fn product_holdings_span_fridges() {
    let (engine, _db) = engine_with_db().await;
    let apple = deposit(&engine, "alice", "f1", "Apple", 1, 2).await;
    deposit(&engine, "alice", "f2", "Apple", 1, 3).await;

    let holdings = engine
        .product_holdings(&apple.product.id, "alice")
        .await
        .unwrap();
    let total: i64 = holdings.iter().map(|e| e.quantity).sum();
    assert_eq!(holdings.len(), 2);
    assert_eq!(total, 5);

    let err = engine
        .product_holdings(&apple.product.id, "bob")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("product not found".to_string()));

    let product = engine.product(&apple.product.id).await.unwrap();
    assert_eq!(product, apple.product);
}
