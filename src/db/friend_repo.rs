//! Relationship ledger: friend requests, friendship edges and blocks.
//!
//! A friendship is stored as a single undirected edge in canonical
//! (smaller, larger) order, so symmetry holds by construction and there
//! is no dual-insert window to race through. A block supersedes every
//! other state between the pair: creating one tears down the edge and
//! any pending requests in the same transaction, and there is no
//! unblock operation.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::account_repo;
use crate::error::ApiError;

fn canonical<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub async fn are_friends(db: &SqlitePool, a: &str, b: &str) -> Result<bool, ApiError> {
    let (lo, hi) = canonical(a, b);
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_a = ? AND user_b = ?)",
    )
    .bind(lo)
    .bind(hi)
    .fetch_one(db)
    .await?;
    Ok(exists != 0)
}

async fn request_pending(db: &SqlitePool, sender: &str, receiver: &str) -> Result<bool, ApiError> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM friend_requests WHERE sender = ? AND receiver = ?)",
    )
    .bind(sender)
    .bind(receiver)
    .fetch_one(db)
    .await?;
    Ok(exists != 0)
}

async fn block_exists(db: &SqlitePool, blocker: &str, blocked: &str) -> Result<bool, ApiError> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM blocks WHERE blocker = ? AND blocked = ?)",
    )
    .bind(blocker)
    .bind(blocked)
    .fetch_one(db)
    .await?;
    Ok(exists != 0)
}

/// Open a pending request from `sender` to `receiver`. Only legal when
/// the pair has no prior state at all.
pub async fn send_request(db: &SqlitePool, sender: &str, receiver: &str) -> Result<(), ApiError> {
    if sender == receiver {
        return Err(ApiError::SelfRequest);
    }
    if account_repo::fetch_opt(db, receiver).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    if block_exists(db, receiver, sender).await? || block_exists(db, sender, receiver).await? {
        return Err(ApiError::Blocked);
    }
    if are_friends(db, sender, receiver).await? {
        return Err(ApiError::AlreadyFriends);
    }
    if request_pending(db, sender, receiver).await? || request_pending(db, receiver, sender).await?
    {
        return Err(ApiError::RequestExists);
    }

    sqlx::query("INSERT OR IGNORE INTO friend_requests (sender, receiver) VALUES (?, ?)")
        .bind(sender)
        .bind(receiver)
        .execute(db)
        .await?;
    Ok(())
}

/// Accept `sender`'s pending request. Safe to call twice: an existing
/// friendship makes this a no-op.
pub async fn accept_request(db: &SqlitePool, receiver: &str, sender: &str) -> Result<(), ApiError> {
    if are_friends(db, receiver, sender).await? {
        return Ok(());
    }

    let deleted = sqlx::query("DELETE FROM friend_requests WHERE sender = ? AND receiver = ?")
        .bind(sender)
        .bind(receiver)
        .execute(db)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    let (lo, hi) = canonical(receiver, sender);
    sqlx::query("INSERT OR IGNORE INTO friendships (user_a, user_b) VALUES (?, ?)")
        .bind(lo)
        .bind(hi)
        .execute(db)
        .await?;
    Ok(())
}

/// Drop `sender`'s pending request without befriending.
pub async fn decline_request(
    db: &SqlitePool,
    receiver: &str,
    sender: &str,
) -> Result<(), ApiError> {
    let deleted = sqlx::query("DELETE FROM friend_requests WHERE sender = ? AND receiver = ?")
        .bind(sender)
        .bind(receiver)
        .execute(db)
        .await?
        .rows_affected();
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// Remove the friendship edge. Absent edges are a no-op.
pub async fn remove_friend(db: &SqlitePool, a: &str, b: &str) -> Result<(), ApiError> {
    let (lo, hi) = canonical(a, b);
    sqlx::query("DELETE FROM friendships WHERE user_a = ? AND user_b = ?")
        .bind(lo)
        .bind(hi)
        .execute(db)
        .await?;
    Ok(())
}

/// Block `blocked`. The friendship edge and any pending requests between
/// the two go away in the same transaction.
pub async fn block(db: &SqlitePool, blocker: &str, blocked: &str) -> Result<(), ApiError> {
    if blocker == blocked {
        return Err(ApiError::SelfRequest);
    }

    let mut tx = db.begin().await?;

    sqlx::query("INSERT OR IGNORE INTO blocks (blocker, blocked) VALUES (?, ?)")
        .bind(blocker)
        .bind(blocked)
        .execute(&mut *tx)
        .await?;

    let (lo, hi) = canonical(blocker, blocked);
    sqlx::query("DELETE FROM friendships WHERE user_a = ? AND user_b = ?")
        .bind(lo)
        .bind(hi)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "DELETE FROM friend_requests
          WHERE (sender = ? AND receiver = ?)
             OR (sender = ? AND receiver = ?)",
    )
    .bind(blocker)
    .bind(blocked)
    .bind(blocked)
    .bind(blocker)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Friends of `me` with their activity timestamps, for presence display.
pub async fn list_friends(
    db: &SqlitePool,
    me: &str,
) -> Result<Vec<(String, Option<i64>)>, ApiError> {
    Ok(sqlx::query_as::<_, (String, Option<i64>)>(
        r#"
        SELECT a.username, a.last_active
          FROM friendships f
          JOIN accounts a
            ON a.username = CASE WHEN f.user_a = ? THEN f.user_b ELSE f.user_a END
         WHERE f.user_a = ? OR f.user_b = ?
         ORDER BY a.username
        "#,
    )
    .bind(me)
    .bind(me)
    .bind(me)
    .fetch_all(db)
    .await?)
}

/// Usernames with a pending request towards `me`.
pub async fn incoming_requests(db: &SqlitePool, me: &str) -> Result<Vec<String>, ApiError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT sender FROM friend_requests WHERE receiver = ? ORDER BY sender",
    )
    .bind(me)
    .fetch_all(db)
    .await?)
}

/// Outcome of looking up `name` from `me`'s point of view.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Yourself,
    NotFound,
    BlockedByTarget,
    AlreadyFriends,
    RequestSent,
    Addable { username: String },
}

pub async fn classify(db: &SqlitePool, me: &str, name: &str) -> Result<SearchOutcome, ApiError> {
    if me == name {
        return Ok(SearchOutcome::Yourself);
    }
    if account_repo::fetch_opt(db, name).await?.is_none() {
        return Ok(SearchOutcome::NotFound);
    }
    if block_exists(db, name, me).await? {
        return Ok(SearchOutcome::BlockedByTarget);
    }
    if are_friends(db, me, name).await? {
        return Ok(SearchOutcome::AlreadyFriends);
    }
    if request_pending(db, me, name).await? {
        return Ok(SearchOutcome::RequestSent);
    }
    Ok(SearchOutcome::Addable {
        username: name.to_string(),
    })
}
