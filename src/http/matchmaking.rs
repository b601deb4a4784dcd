//! Matchmaking queue endpoints and result reporting.
//!
//! There is no background pairing loop: join and status both run the
//! pairing step inline, so the second player's request completes a
//! waiting pair.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::models::MatchRow;
use crate::db::queue_repo;
use crate::error::ApiError;
use crate::http::auth::Identity;
use crate::metrics;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueueStatus {
    Idle,
    Queued,
    Matched { match_id: String, opponent: String },
}

fn matched(m: &MatchRow, me: &str) -> QueueStatus {
    let opponent = if m.p1 == me {
        m.p2.clone()
    } else {
        m.p1.clone()
    };
    QueueStatus::Matched {
        match_id: m.id.clone(),
        opponent,
    }
}

async fn pair_step(db: &SqlitePool) -> Result<(), ApiError> {
    if let Some(m) = queue_repo::try_pair(db).await? {
        metrics::MATCHES_PAIRED.inc();
        log::info!("paired {} vs {} (match {})", m.p1, m.p2, m.id);
    }
    Ok(())
}

async fn status_of(db: &SqlitePool, me: &str) -> Result<QueueStatus, ApiError> {
    if let Some(m) = queue_repo::open_match_for(db, me).await? {
        return Ok(matched(&m, me));
    }
    if queue_repo::is_queued(db, me).await? {
        return Ok(QueueStatus::Queued);
    }
    Ok(QueueStatus::Idle)
}

/// POST /api/matchmaking/join — enqueue, then immediately try to pair.
#[post("/matchmaking/join")]
pub async fn join(me: Identity, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    queue_repo::enqueue(&db, &me.username).await?;
    pair_step(&db).await?;
    Ok(HttpResponse::Ok().json(status_of(&db, &me.username).await?))
}

/// POST /api/matchmaking/leave
#[post("/matchmaking/leave")]
pub async fn leave(me: Identity, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    queue_repo::leave(&db, &me.username).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "left" })))
}

/// GET /api/matchmaking/status — poll endpoint; also drives pairing.
#[get("/matchmaking/status")]
pub async fn status(me: Identity, db: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    pair_step(&db).await?;
    Ok(HttpResponse::Ok().json(status_of(&db, &me.username).await?))
}

#[derive(Deserialize)]
pub struct ResultRequest {
    pub match_id: String,
    pub winner: String,
}

/// POST /api/matchmaking/result — the reporter must have played the
/// match, and the match id is always explicit.
#[post("/matchmaking/result")]
pub async fn report_result(
    me: Identity,
    info: web::Json<ResultRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let m = queue_repo::find(&db, &info.match_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if m.p1 != me.username && m.p2 != me.username {
        return Err(ApiError::Unauthorized);
    }
    queue_repo::report_result(&db, &info.match_id, &info.winner).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "recorded" })))
}

#[derive(Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub opponent: String,
    /// None while the match is unresolved.
    pub won: Option<bool>,
}

/// GET /api/matchmaking/history/{username}
#[get("/matchmaking/history/{username}")]
pub async fn history(
    _me: Identity,
    path: web::Path<String>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let username = path.into_inner();
    let rows = queue_repo::history(&db, &username, 50).await?;
    let out: Vec<MatchSummary> = rows
        .iter()
        .map(|m| MatchSummary {
            match_id: m.id.clone(),
            opponent: if m.p1 == username {
                m.p2.clone()
            } else {
                m.p1.clone()
            },
            won: m.winner.as_ref().map(|w| *w == username),
        })
        .collect();
    Ok(HttpResponse::Ok().json(out))
}

/// Mount
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(join)
        .service(leave)
        .service(status)
        .service(report_result)
        .service(history);
}
