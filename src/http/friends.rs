//! Friends graph: list, search, request / accept / decline, remove, block.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::friend_repo;
use crate::error::ApiError;
use crate::http::auth::Identity;
use crate::presence;

//////////////////////////////////////////////////
// Data transfer objects
//////////////////////////////////////////////////

#[derive(Serialize)]
pub struct FriendEntry {
    pub username: String,
    pub online: bool,
}

#[derive(Serialize)]
pub struct FriendsView {
    pub friends: Vec<FriendEntry>,
    pub incoming: Vec<String>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub username: String,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// GET /api/friends — friend list with presence plus pending senders.
#[get("/friends")]
pub async fn overview(me: Identity, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let friends = friend_repo::list_friends(&db, &me.username)
        .await?
        .into_iter()
        .map(|(username, last_active)| FriendEntry {
            username,
            online: presence::is_online(last_active),
        })
        .collect();
    let incoming = friend_repo::incoming_requests(&db, &me.username).await?;
    Ok(HttpResponse::Ok().json(FriendsView { friends, incoming }))
}

/// POST /api/friends/search — classify a username from the caller's
/// point of view (self / unknown / blocked / friends / pending / addable).
#[post("/friends/search")]
pub async fn search(
    me: Identity,
    info: web::Json<SearchRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let outcome = friend_repo::classify(&db, &me.username, &info.username).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// POST /api/friends/request/{username}
#[post("/friends/request/{username}")]
pub async fn send_request(
    me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    friend_repo::send_request(&db, &me.username, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /api/friends/accept/{username}
#[post("/friends/accept/{username}")]
pub async fn accept(
    me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    friend_repo::accept_request(&db, &me.username, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /api/friends/decline/{username}
#[post("/friends/decline/{username}")]
pub async fn decline(
    me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    friend_repo::decline_request(&db, &me.username, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /api/friends/remove/{username}
#[post("/friends/remove/{username}")]
pub async fn remove(
    me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    friend_repo::remove_friend(&db, &me.username, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// POST /api/friends/block/{username}
#[post("/friends/block/{username}")]
pub async fn block(
    me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let target = path.into_inner();
    friend_repo::block(&db, &me.username, &target).await?;
    log::info!("{} blocked {}", me.username, target);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(overview)
        .service(search)
        .service(send_request)
        .service(accept)
        .service(decline)
        .service(remove)
        .service(block);
}
