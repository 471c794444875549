//! API routes

mod auth;
mod health;
mod items;
mod types;

use axum::Router;

use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check and root banner
        .merge(health::routes())
        // Registration and login
        .merge(auth::routes())
        // Owner-scoped item CRUD
        .merge(items::routes())
        .with_state(state)
}
