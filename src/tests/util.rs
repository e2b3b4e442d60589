use crate::db::{connect_db, migrate, Database};

/// Fresh in-memory database with the embedded migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn init_test_db() -> Database {
    let pool = connect_db("sqlite::memory:", 1)
        .await
        .expect("failed to create in-memory database");
    migrate(&pool).await.expect("failed to run migrations");
    Database::new(pool)
}
