//! Relationship ledger state machine: requests, edges, blocks.

mod common;

use arena_server::db::friend_repo::{self, SearchOutcome};
use arena_server::error::ApiError;
use common::{mem_pool, seed_account};

#[tokio::test]
async fn request_then_accept_creates_symmetric_friendship() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "bob", "alice").await.unwrap();
    friend_repo::accept_request(&db, "alice", "bob").await.unwrap();

    assert!(friend_repo::are_friends(&db, "alice", "bob").await.unwrap());
    assert!(friend_repo::are_friends(&db, "bob", "alice").await.unwrap());

    // the pending request is consumed
    assert!(friend_repo::incoming_requests(&db, "alice")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn accept_is_idempotent() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "bob", "alice").await.unwrap();
    friend_repo::accept_request(&db, "alice", "bob").await.unwrap();
    // second accept after the request is gone: no error, still friends
    friend_repo::accept_request(&db, "alice", "bob").await.unwrap();

    let friends = friend_repo::list_friends(&db, "alice").await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].0, "bob");
}

#[tokio::test]
async fn accept_without_pending_request_fails() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    let res = friend_repo::accept_request(&db, "alice", "bob").await;
    assert!(matches!(res, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn decline_removes_request_and_makes_sender_addable_again() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "bob", "alice").await.unwrap();
    friend_repo::decline_request(&db, "alice", "bob").await.unwrap();

    assert!(!friend_repo::are_friends(&db, "alice", "bob").await.unwrap());
    // from alice's side bob is addable again, not "request pending"
    assert_eq!(
        friend_repo::classify(&db, "alice", "bob").await.unwrap(),
        SearchOutcome::Addable {
            username: "bob".into()
        }
    );
}

#[tokio::test]
async fn self_request_rejected() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;

    let res = friend_repo::send_request(&db, "alice", "alice").await;
    assert!(matches!(res, Err(ApiError::SelfRequest)));
}

#[tokio::test]
async fn request_to_unknown_user_rejected() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;

    let res = friend_repo::send_request(&db, "alice", "ghost").await;
    assert!(matches!(res, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn duplicate_request_rejected_in_both_directions() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "alice", "bob").await.unwrap();

    let same = friend_repo::send_request(&db, "alice", "bob").await;
    assert!(matches!(same, Err(ApiError::RequestExists)));

    let reverse = friend_repo::send_request(&db, "bob", "alice").await;
    assert!(matches!(reverse, Err(ApiError::RequestExists)));
}

#[tokio::test]
async fn request_between_friends_rejected() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "alice", "bob").await.unwrap();
    friend_repo::accept_request(&db, "bob", "alice").await.unwrap();

    let res = friend_repo::send_request(&db, "alice", "bob").await;
    assert!(matches!(res, Err(ApiError::AlreadyFriends)));
}

#[tokio::test]
async fn remove_friend_is_noop_when_not_friends() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::remove_friend(&db, "alice", "bob").await.unwrap();
    assert!(!friend_repo::are_friends(&db, "alice", "bob").await.unwrap());
}

#[tokio::test]
async fn remove_friend_drops_edge_for_both_sides() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "alice", "bob").await.unwrap();
    friend_repo::accept_request(&db, "bob", "alice").await.unwrap();
    friend_repo::remove_friend(&db, "bob", "alice").await.unwrap();

    assert!(!friend_repo::are_friends(&db, "alice", "bob").await.unwrap());
    assert!(friend_repo::list_friends(&db, "bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn block_cancels_friendship_and_requests_both_directions() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "alice", "bob").await.unwrap();
    friend_repo::accept_request(&db, "bob", "alice").await.unwrap();

    friend_repo::block(&db, "alice", "bob").await.unwrap();

    assert!(friend_repo::list_friends(&db, "alice").await.unwrap().is_empty());
    assert!(friend_repo::list_friends(&db, "bob").await.unwrap().is_empty());
    assert!(friend_repo::incoming_requests(&db, "alice").await.unwrap().is_empty());
    assert!(friend_repo::incoming_requests(&db, "bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn block_clears_pending_request_from_the_blocked_side() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::send_request(&db, "bob", "alice").await.unwrap();
    friend_repo::block(&db, "alice", "bob").await.unwrap();

    assert!(friend_repo::incoming_requests(&db, "alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn blocked_user_cannot_send_request() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::block(&db, "alice", "bob").await.unwrap();

    let res = friend_repo::send_request(&db, "bob", "alice").await;
    assert!(matches!(res, Err(ApiError::Blocked)));
}

#[tokio::test]
async fn blocker_cannot_re_friend_either() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::block(&db, "alice", "bob").await.unwrap();

    let res = friend_repo::send_request(&db, "alice", "bob").await;
    assert!(matches!(res, Err(ApiError::Blocked)));
}

#[tokio::test]
async fn block_is_idempotent() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;

    friend_repo::block(&db, "alice", "bob").await.unwrap();
    friend_repo::block(&db, "alice", "bob").await.unwrap();
}

#[tokio::test]
async fn classify_covers_every_branch() {
    let db = mem_pool().await;
    seed_account(&db, "alice").await;
    seed_account(&db, "bob").await;
    seed_account(&db, "carol").await;
    seed_account(&db, "dave").await;

    assert_eq!(
        friend_repo::classify(&db, "alice", "alice").await.unwrap(),
        SearchOutcome::Yourself
    );
    assert_eq!(
        friend_repo::classify(&db, "alice", "ghost").await.unwrap(),
        SearchOutcome::NotFound
    );

    friend_repo::block(&db, "bob", "alice").await.unwrap();
    assert_eq!(
        friend_repo::classify(&db, "alice", "bob").await.unwrap(),
        SearchOutcome::BlockedByTarget
    );

    friend_repo::send_request(&db, "alice", "carol").await.unwrap();
    friend_repo::accept_request(&db, "carol", "alice").await.unwrap();
    assert_eq!(
        friend_repo::classify(&db, "alice", "carol").await.unwrap(),
        SearchOutcome::AlreadyFriends
    );

    friend_repo::send_request(&db, "alice", "dave").await.unwrap();
    assert_eq!(
        friend_repo::classify(&db, "alice", "dave").await.unwrap(),
        SearchOutcome::RequestSent
    );
}
