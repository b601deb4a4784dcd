use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Fresh in-memory database. Capped at one connection so every query in
/// the test sees the same memory-backed file.
pub async fn mem_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    arena_server::db::init_schema(&pool).await.expect("schema");
    pool
}

#[allow(dead_code)]
pub async fn seed_account(pool: &SqlitePool, username: &str) {
    arena_server::db::account_repo::create(pool, username, "pw")
        .await
        .expect("seed account");
}
