//! Account registration, authentication and mutation.

mod common;

use arena_server::db::account_repo;
use arena_server::error::ApiError;
use common::mem_pool;

#[tokio::test]
async fn register_then_login() {
    let db = mem_pool().await;

    let created = account_repo::create(&db, "alice", "pw1").await.unwrap();
    assert_eq!(created.username, "alice");
    assert_eq!(created.rating, 1000);
    assert_eq!(created.avatar_ref, "/static/avatars/default.png");

    let authed = account_repo::authenticate(&db, "alice", "pw1").await.unwrap();
    assert_eq!(authed.username, "alice");
}

#[tokio::test]
async fn wrong_password_rejected_and_hash_untouched() {
    let db = mem_pool().await;
    account_repo::create(&db, "alice", "pw1").await.unwrap();
    let before = account_repo::fetch(&db, "alice").await.unwrap();

    let res = account_repo::authenticate(&db, "alice", "pw2").await;
    assert!(matches!(res, Err(ApiError::InvalidCredential)));

    let after = account_repo::fetch(&db, "alice").await.unwrap();
    assert_eq!(before.credential_hash, after.credential_hash);

    // the right password still works
    account_repo::authenticate(&db, "alice", "pw1").await.unwrap();
}

#[tokio::test]
async fn login_with_unseen_username_does_not_create_an_account() {
    let db = mem_pool().await;

    let res = account_repo::authenticate(&db, "alice", "pw1").await;
    assert!(matches!(res, Err(ApiError::NotFound)));
    assert!(account_repo::fetch_opt(&db, "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_rejected() {
    let db = mem_pool().await;
    account_repo::create(&db, "alice", "pw1").await.unwrap();

    let res = account_repo::create(&db, "alice", "other").await;
    assert!(matches!(res, Err(ApiError::UsernameTaken)));
}

#[tokio::test]
async fn empty_credentials_rejected() {
    let db = mem_pool().await;
    assert!(account_repo::create(&db, "", "pw").await.is_err());
    assert!(account_repo::create(&db, "alice", "").await.is_err());
}

#[tokio::test]
async fn touch_refreshes_last_active() {
    let db = mem_pool().await;
    account_repo::create(&db, "alice", "pw").await.unwrap();

    sqlx::query("UPDATE accounts SET last_active = 1 WHERE username = 'alice'")
        .execute(&db)
        .await
        .unwrap();

    account_repo::touch(&db, "alice").await.unwrap();
    let account = account_repo::fetch(&db, "alice").await.unwrap();
    assert!(account.last_active.unwrap() > 1);
}

#[tokio::test]
async fn touch_unknown_username_is_a_noop() {
    let db = mem_pool().await;
    account_repo::touch(&db, "ghost").await.unwrap();
}

#[tokio::test]
async fn set_avatar_updates_the_ref() {
    let db = mem_pool().await;
    account_repo::create(&db, "alice", "pw").await.unwrap();

    account_repo::set_avatar(&db, "alice", "/static/avatars/alice_me.png")
        .await
        .unwrap();
    let account = account_repo::fetch(&db, "alice").await.unwrap();
    assert_eq!(account.avatar_ref, "/static/avatars/alice_me.png");
}

#[tokio::test]
async fn rating_adjustments_accumulate_without_a_floor() {
    let db = mem_pool().await;
    account_repo::create(&db, "alice", "pw").await.unwrap();

    account_repo::adjust_rating(&db, "alice", -600).await.unwrap();
    account_repo::adjust_rating(&db, "alice", -600).await.unwrap();

    let account = account_repo::fetch(&db, "alice").await.unwrap();
    assert_eq!(account.rating, -200);
}
