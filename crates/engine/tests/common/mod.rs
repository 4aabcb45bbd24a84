use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, ExpenseNew, MoneyCents, TransactionKind, User};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine_with_user() -> (Engine, User) {
    let (engine, _db) = engine_with_db().await;
    let user = engine
        .sign_up("alice", "alice@example.com", "password")
        .await
        .unwrap();
    (engine, user)
}

#[allow(dead_code)]
pub fn entry(category: &str, kind: TransactionKind, rand: &str, date: &str) -> ExpenseNew {
    ExpenseNew {
        amount: rand.parse::<MoneyCents>().unwrap(),
        category: category.to_string(),
        kind,
        date: date.to_string(),
        start_time: "08:00".to_string(),
        end_time: "09:00".to_string(),
        description: None,
        photo_path: None,
    }
}
