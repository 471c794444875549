//! Authentication extractor and routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use stash_auth::{hash_password, verify_password};
use stash_db::NewUser;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::types::{AuthData, LoginRequest, RegisterRequest, UserResponse};

// ==================== Auth Extractor ====================

/// Authenticated identity attached to a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Extractor for the verified bearer identity (required)
///
/// Every item handler takes this extractor, so no item operation runs
/// without a successfully verified token.
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::TokenMissing)?;

        let claims = app_state.jwt.validate_token(token)?;
        let id = claims.sub.parse().map_err(|_| ApiError::TokenRejected)?;

        debug!("Authenticated user: {}", claims.username);

        Ok(RequireAuth(AuthUser {
            id,
            username: claims.username,
        }))
    }
}

// ==================== Auth Routes ====================

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), ApiError> {
    if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    debug!("Registration attempt for user: {}", request.username);

    // Hashing is CPU-bound, keep it off the request-dispatch path
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))??;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;

    let token = state.jwt.generate_token(user.id, &user.username)?;

    info!("User {} registered successfully", user.username);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "User registered successfully",
            AuthData {
                token,
                user: UserResponse::from(user),
            },
        )),
    ))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    debug!("Login attempt for email: {}", request.email);

    // Find user - but don't return early to prevent timing attacks
    let user_result = state.db.get_user_by_email(&request.email).await?;

    // Verify password - always perform verification to prevent timing attacks
    // Use a dummy hash when user doesn't exist to maintain constant-time behavior
    // This dummy hash is a valid Argon2 hash that will always fail verification
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password = request.password;
    let password_valid =
        tokio::task::spawn_blocking(move || verify_password(&password, &hash_to_verify))
            .await
            .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))??;

    // Identical failure for unknown email and wrong password
    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => return Err(ApiError::InvalidCredentials),
    };

    let token = state.jwt.generate_token(user.id, &user.username)?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(ApiResponse::with_data(
        "Login successful",
        AuthData {
            token,
            user: UserResponse::from(user),
        },
    )))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
