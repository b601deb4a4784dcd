use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub username: String,
    pub credential_hash: String,
    pub rating: i64,
    pub avatar_ref: String,
    /// Unix seconds of the last authenticated request, None before first login.
    pub last_active: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct QueueEntry {
    pub username: String,
    /// Rating captured at enqueue time, not kept in sync afterwards.
    pub rating: i64,
    /// Unix milliseconds; pairing order.
    pub joined_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: String,
    pub p1: String,
    pub p2: String,
    pub winner: Option<String>,
    pub created_at: i64,
}
