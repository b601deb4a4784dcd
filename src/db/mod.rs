//! SQLite-backed persistence: pool construction, schema and repositories.

pub mod account_repo;
pub mod friend_repo;
pub mod models;
pub mod queue_repo;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    username        TEXT PRIMARY KEY,
    credential_hash TEXT NOT NULL,
    rating          INTEGER NOT NULL DEFAULT 1000,
    avatar_ref      TEXT NOT NULL DEFAULT '/static/avatars/default.png',
    last_active     INTEGER
);

CREATE TABLE IF NOT EXISTS friend_requests (
    sender   TEXT NOT NULL,
    receiver TEXT NOT NULL,
    PRIMARY KEY (sender, receiver)
);

CREATE TABLE IF NOT EXISTS friendships (
    user_a TEXT NOT NULL,
    user_b TEXT NOT NULL,
    PRIMARY KEY (user_a, user_b),
    CHECK (user_a < user_b)
);

CREATE TABLE IF NOT EXISTS blocks (
    blocker TEXT NOT NULL,
    blocked TEXT NOT NULL,
    PRIMARY KEY (blocker, blocked)
);

CREATE TABLE IF NOT EXISTS queue (
    username  TEXT PRIMARY KEY,
    rating    INTEGER NOT NULL,
    joined_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS matches (
    id         TEXT PRIMARY KEY,
    p1         TEXT NOT NULL,
    p2         TEXT NOT NULL,
    winner     TEXT,
    created_at INTEGER NOT NULL
)
"#;

/// Open (or create) the database file and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Create every table this server uses. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}
