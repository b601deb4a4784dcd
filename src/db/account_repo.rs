//! Account creation, authentication and field mutation.
//!
//! Registration and login are separate operations: authenticating an
//! unseen username fails with `NotFound` instead of silently creating
//! the account.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::models::Account;
use crate::error::ApiError;

fn hash_secret(secret: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("password hash failed: {e}")))
}

fn verify_secret(stored: &str, secret: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Create a new account with the default rating and avatar.
pub async fn create(db: &SqlitePool, username: &str, secret: &str) -> Result<Account, ApiError> {
    if username.is_empty() || secret.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".into(),
        ));
    }

    let hash = hash_secret(secret)?;
    let res = sqlx::query(
        "INSERT INTO accounts (username, credential_hash, last_active) VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(&hash)
    .bind(Utc::now().timestamp())
    .execute(db)
    .await;

    match res {
        Ok(_) => fetch(db, username).await,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(ApiError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

/// Check `secret` against the stored hash. A failed attempt never alters
/// the stored credential.
pub async fn authenticate(
    db: &SqlitePool,
    username: &str,
    secret: &str,
) -> Result<Account, ApiError> {
    let account = fetch_opt(db, username).await?.ok_or(ApiError::NotFound)?;
    if !verify_secret(&account.credential_hash, secret) {
        return Err(ApiError::InvalidCredential);
    }
    touch(db, username).await?;
    Ok(account)
}

/// Refresh the activity timestamp. Unknown usernames are a no-op.
pub async fn touch(db: &SqlitePool, username: &str) -> Result<(), ApiError> {
    sqlx::query("UPDATE accounts SET last_active = ? WHERE username = ?")
        .bind(Utc::now().timestamp())
        .bind(username)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn fetch(db: &SqlitePool, username: &str) -> Result<Account, ApiError> {
    fetch_opt(db, username).await?.ok_or(ApiError::NotFound)
}

pub async fn fetch_opt(db: &SqlitePool, username: &str) -> Result<Option<Account>, ApiError> {
    Ok(sqlx::query_as::<_, Account>(
        "SELECT username, credential_hash, rating, avatar_ref, last_active
           FROM accounts
          WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(db)
    .await?)
}

pub async fn set_avatar(db: &SqlitePool, username: &str, avatar_ref: &str) -> Result<(), ApiError> {
    let res = sqlx::query("UPDATE accounts SET avatar_ref = ? WHERE username = ?")
        .bind(avatar_ref)
        .bind(username)
        .execute(db)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// Apply a rating delta. Ratings are unclamped and may go negative.
pub async fn adjust_rating(db: &SqlitePool, username: &str, delta: i64) -> Result<(), ApiError> {
    let res = sqlx::query("UPDATE accounts SET rating = rating + ? WHERE username = ?")
        .bind(delta)
        .bind(username)
        .execute(db)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}
