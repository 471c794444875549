//! Health check endpoints

use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Root banner payload
#[derive(Serialize)]
pub struct BannerData {
    pub timestamp: String,
}

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Root banner handler
async fn banner() -> Json<ApiResponse<BannerData>> {
    Json(ApiResponse::with_data(
        "Stash backend is running",
        BannerData {
            timestamp: Utc::now().to_rfc3339(),
        },
    ))
}

/// Health check handler
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
