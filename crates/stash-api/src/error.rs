//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    TokenMissing,

    #[error("Invalid or expired token")]
    TokenRejected,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] stash_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] stash_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "Access token required".to_string(),
            ),
            ApiError::TokenRejected => (
                StatusCode::FORBIDDEN,
                "Invalid or expired token".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Database(e) => match e {
                stash_db::DbError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
                _ => {
                    // Operators get the detail; clients get a generic message
                    error!("Database error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ApiError::Auth(e) => match e {
                stash_auth::AuthError::InvalidToken | stash_auth::AuthError::TokenExpired => (
                    StatusCode::FORBIDDEN,
                    "Invalid or expired token".to_string(),
                ),
                _ => {
                    error!("Auth error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        let body = axum::Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
