#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{DepositCmd, Engine, FridgeNewCmd, ProductType, StockEntry, UserNewCmd};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    engine
        .new_user(UserNewCmd::new("alice@example.com", "Alice", "Smith").id("alice"))
        .await
        .unwrap();
    engine
        .new_user(UserNewCmd::new("bob@example.com", "Bob", "Jones").id("bob"))
        .await
        .unwrap();
    engine
        .new_fridge(FridgeNewCmd::new(1, 100).id("f1"))
        .await
        .unwrap();
    engine
        .new_fridge(FridgeNewCmd::new(2, 50).id("f2"))
        .await
        .unwrap();

    (engine, db)
}

pub async fn deposit(
    engine: &Engine,
    user_id: &str,
    fridge_id: &str,
    name: &str,
    size: i64,
    amount: i64,
) -> StockEntry {
    engine
        .deposit(DepositCmd::product(
            user_id,
            fridge_id,
            name,
            ProductType::Food,
            size,
            amount,
        ))
        .await
        .unwrap()
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub async fn quantity(
    db: &DatabaseConnection,
    product_id: &str,
    fridge_id: &str,
    user_id: &str,
) -> Option<i64> {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT quantity FROM stock WHERE product_id = ? AND fridge_id = ? AND user_id = ?",
            vec![product_id.into(), fridge_id.into(), user_id.into()],
        ))
        .await
        .unwrap()?;
    Some(row.try_get::<i64>("", "quantity").unwrap())
}
