// src/http/leaderboard.rs

use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    /// Maximum number of entries to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Serialize, sqlx::FromRow)]
pub struct LeaderboardRow {
    pub username: String,
    pub rating: i64,
}

/// GET /api/leaderboard?limit=
#[get("/leaderboard")]
pub async fn leaderboard(
    web::Query(params): web::Query<LeaderboardParams>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let limit = params.limit.clamp(1, 100);
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT username, rating
          FROM accounts
         ORDER BY rating DESC, username
         LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(db.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Mounts the leaderboard route under `/api`
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(leaderboard);
}
