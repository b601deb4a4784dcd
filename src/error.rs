//! Error taxonomy shared by the repositories and the HTTP layer.
//!
//! Every named condition is recoverable and renders as a 4xx JSON body;
//! `Storage` and `Blob` are the fatal class and surface as a generic 500.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown user")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredential,

    #[error("username already taken")]
    UsernameTaken,

    #[error("cannot target yourself")]
    SelfRequest,

    #[error("already friends")]
    AlreadyFriends,

    #[error("request already pending")]
    RequestExists,

    #[error("blocked")]
    Blocked,

    #[error("not signed in")]
    Unauthorized,

    #[error("match result already recorded")]
    MatchResolved,

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage failure")]
    Storage(#[from] sqlx::Error),

    #[error("blob storage failure: {0}")]
    Blob(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidCredential | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Blocked => StatusCode::FORBIDDEN,
            ApiError::UsernameTaken
            | ApiError::SelfRequest
            | ApiError::AlreadyFriends
            | ApiError::RequestExists
            | ApiError::MatchResolved
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Storage(_) | ApiError::Blob(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Storage(e) => {
                log::error!("storage failure: {e}");
                "internal error".to_string()
            }
            ApiError::Internal(e) | ApiError::Blob(e) => {
                log::error!("{e}");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
