//! Stash REST API
//!
//! This crate provides the Axum-based HTTP API for Stash:
//! registration/login and owner-scoped item CRUD.

pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use response::ApiResponse;
pub use routes::create_router;
pub use state::AppState;
