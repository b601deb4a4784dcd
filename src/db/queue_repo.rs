//! FIFO matchmaking queue and match records.
//!
//! Pairing is strictly by join time with no rating-band search; the
//! captured rating travels with the entry for display only.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::account_repo;
use crate::db::models::{MatchRow, QueueEntry};
use crate::error::ApiError;

/// Rating points moved from loser to winner on every reported result.
pub const RATING_DELTA: i64 = 25;

/// Join the queue, capturing the caller's current rating. Re-entering
/// replaces the previous entry.
pub async fn enqueue(db: &SqlitePool, username: &str) -> Result<(), ApiError> {
    let account = account_repo::fetch(db, username).await?;
    sqlx::query(
        r#"
        INSERT INTO queue (username, rating, joined_at) VALUES (?, ?, ?)
        ON CONFLICT(username)
        DO UPDATE SET rating = excluded.rating, joined_at = excluded.joined_at
        "#,
    )
    .bind(username)
    .bind(account.rating)
    .bind(Utc::now().timestamp_millis())
    .execute(db)
    .await?;
    Ok(())
}

/// Leave the queue. Not being queued is a no-op.
pub async fn leave(db: &SqlitePool, username: &str) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM queue WHERE username = ?")
        .bind(username)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn is_queued(db: &SqlitePool, username: &str) -> Result<bool, ApiError> {
    let exists =
        sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM queue WHERE username = ?)")
            .bind(username)
            .fetch_one(db)
            .await?;
    Ok(exists != 0)
}

/// Pair the two oldest waiters into a fresh match. Returns None while
/// fewer than two entries are waiting.
pub async fn try_pair(db: &SqlitePool) -> Result<Option<MatchRow>, ApiError> {
    let mut tx = db.begin().await?;

    let pair = sqlx::query_as::<_, QueueEntry>(
        "SELECT username, rating, joined_at FROM queue
          ORDER BY joined_at ASC, username ASC
          LIMIT 2",
    )
    .fetch_all(&mut *tx)
    .await?;
    if pair.len() < 2 {
        return Ok(None);
    }

    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp();

    sqlx::query("DELETE FROM queue WHERE username IN (?, ?)")
        .bind(&pair[0].username)
        .bind(&pair[1].username)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO matches (id, p1, p2, winner, created_at) VALUES (?, ?, ?, NULL, ?)")
        .bind(&id)
        .bind(&pair[0].username)
        .bind(&pair[1].username)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(MatchRow {
        id,
        p1: pair[0].username.clone(),
        p2: pair[1].username.clone(),
        winner: None,
        created_at,
    }))
}

pub async fn find(db: &SqlitePool, match_id: &str) -> Result<Option<MatchRow>, ApiError> {
    Ok(sqlx::query_as::<_, MatchRow>(
        "SELECT id, p1, p2, winner, created_at FROM matches WHERE id = ?",
    )
    .bind(match_id)
    .fetch_optional(db)
    .await?)
}

/// Most recent unresolved match involving `username`, if any.
pub async fn open_match_for(
    db: &SqlitePool,
    username: &str,
) -> Result<Option<MatchRow>, ApiError> {
    Ok(sqlx::query_as::<_, MatchRow>(
        "SELECT id, p1, p2, winner, created_at FROM matches
          WHERE winner IS NULL AND (p1 = ? OR p2 = ?)
          ORDER BY created_at DESC
          LIMIT 1",
    )
    .bind(username)
    .bind(username)
    .fetch_optional(db)
    .await?)
}

/// Most recent matches involving `username`, resolved or not.
pub async fn history(
    db: &SqlitePool,
    username: &str,
    limit: i64,
) -> Result<Vec<MatchRow>, ApiError> {
    Ok(sqlx::query_as::<_, MatchRow>(
        "SELECT id, p1, p2, winner, created_at FROM matches
          WHERE p1 = ? OR p2 = ?
          ORDER BY created_at DESC
          LIMIT ?",
    )
    .bind(username)
    .bind(username)
    .bind(limit)
    .fetch_all(db)
    .await?)
}

/// Record the winner of `match_id` and settle both ratings in one
/// transaction. A match resolves exactly once and the winner must be
/// one of its players.
pub async fn report_result(
    db: &SqlitePool,
    match_id: &str,
    winner: &str,
) -> Result<(), ApiError> {
    let mut tx = db.begin().await?;

    let m = sqlx::query_as::<_, MatchRow>(
        "SELECT id, p1, p2, winner, created_at FROM matches WHERE id = ?",
    )
    .bind(match_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound)?;

    if m.winner.is_some() {
        return Err(ApiError::MatchResolved);
    }
    let loser = if winner == m.p1 {
        m.p2.clone()
    } else if winner == m.p2 {
        m.p1.clone()
    } else {
        return Err(ApiError::BadRequest("winner did not play this match".into()));
    };

    sqlx::query("UPDATE matches SET winner = ? WHERE id = ?")
        .bind(winner)
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE accounts SET rating = rating + ? WHERE username = ?")
        .bind(RATING_DELTA)
        .bind(winner)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE accounts SET rating = rating - ? WHERE username = ?")
        .bind(RATING_DELTA)
        .bind(&loser)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
