//! Username/password authentication (JWT sessions)

use actix_web::{post, web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::config::settings;
use crate::db::account_repo;
use crate::error::ApiError;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct CredentialRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    exp: usize,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
    pub expires_in: i64,
}

fn issue_token(username: &str) -> Result<TokenResponse, ApiError> {
    let ttl = Duration::minutes(settings().token_ttl_minutes);
    let exp = (Utc::now() + ttl).timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings().session_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encode failed: {e}")))?;
    Ok(TokenResponse {
        token,
        username: username.to_string(),
        expires_in: ttl.num_seconds(),
    })
}

//////////////////////////////////////////////////
// ─────────────  Identity extractor  ───────────
//////////////////////////////////////////////////

pub mod extractor {
    use super::Claims;
    use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
    use futures_util::future::LocalBoxFuture;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use sqlx::SqlitePool;

    use crate::config::settings;
    use crate::db::account_repo;
    use crate::error::ApiError;

    /// Validates the Bearer token and refreshes the caller's activity
    /// timestamp, so every authenticated request doubles as a presence
    /// heartbeat.
    #[derive(Debug, Clone)]
    pub struct Identity {
        pub username: String,
    }

    impl FromRequest for Identity {
        type Error = ApiError;
        type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let req = req.clone();
            Box::pin(async move {
                // Expect:  Authorization: Bearer <JWT>
                let hdr = req
                    .headers()
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .ok_or(ApiError::Unauthorized)?;
                let token = hdr.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

                let data = decode::<Claims>(
                    token,
                    &DecodingKey::from_secret(settings().session_secret.as_bytes()),
                    &Validation::default(),
                )
                .map_err(|_| ApiError::Unauthorized)?;
                let username = data.claims.sub;

                if let Some(db) = req.app_data::<web::Data<SqlitePool>>() {
                    if let Err(e) = account_repo::touch(db, &username).await {
                        log::warn!("presence touch for {username} failed: {e}");
                    }
                }

                Ok(Identity { username })
            })
        }
    }
}
pub use extractor::Identity; // <-- makes path crate::http::auth::Identity work

//////////////////////////////////////////////////
// POST /api/auth/register
//////////////////////////////////////////////////
#[post("/auth/register")]
pub async fn register(
    info: web::Json<CredentialRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let account = account_repo::create(&db, &info.username, &info.password).await?;
    log::info!("registered account {}", account.username);
    Ok(HttpResponse::Ok().json(issue_token(&account.username)?))
}

//////////////////////////////////////////////////
// POST /api/auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    info: web::Json<CredentialRequest>,
    db: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let account = account_repo::authenticate(&db, &info.username, &info.password).await?;
    Ok(HttpResponse::Ok().json(issue_token(&account.username)?))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}
