#![allow(dead_code)]

use std::path::PathBuf;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Currency, Engine, Wallet};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn add_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

async fn engine_on(url: &str) -> (Engine, DatabaseConnection) {
    let db = Database::connect(url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    for user in ["amina", "baraka"] {
        add_user(&db, user).await;
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// Engine on an in-memory store with users `amina` and `baraka`.
pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_on("sqlite::memory:").await
}

/// Engine on a file-backed store, so several pool connections write
/// concurrently.
pub async fn engine_with_file_db() -> (Engine, DatabaseConnection, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let (engine, db) = engine_on(&url).await;
    (engine, db, path)
}

pub fn wallet_for(wallets: &[Wallet], currency: Currency) -> Wallet {
    wallets
        .iter()
        .find(|wallet| wallet.currency == currency)
        .cloned()
        .unwrap_or_else(|| panic!("{currency} wallet missing"))
}
