//! Profile views and avatar upload.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::blob::AvatarStore;
use crate::db::account_repo;
use crate::error::ApiError;
use crate::http::auth::Identity;
use crate::presence;

#[derive(Serialize)]
pub struct ProfileView {
    pub username: String,
    pub rating: i64,
    pub avatar: String,
    pub online: bool,
}

/// GET /api/profile/{username}
#[get("/profile/{username}")]
pub async fn profile(
    _me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let account = account_repo::fetch(&db, &username).await?;
    Ok(HttpResponse::Ok().json(ProfileView {
        username: account.username,
        rating: account.rating,
        avatar: account.avatar_ref,
        online: presence::is_online(account.last_active),
    }))
}

#[derive(Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

/// POST /api/profile/avatar?filename=me.png with the raw image bytes as
/// the request body. The stored ref replaces the account's avatar.
#[post("/profile/avatar")]
pub async fn upload_avatar(
    me: Identity,
    web::Query(params): web::Query<UploadParams>,
    body: web::Bytes,
    db: web::Data<SqlitePool>,
    store: web::Data<AvatarStore>,
) -> Result<HttpResponse, ApiError> {
    let avatar = store.save(&me.username, &params.filename, &body).await?;
    account_repo::set_avatar(&db, &me.username, &avatar).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "avatar": avatar })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(profile).service(upload_avatar);
}
