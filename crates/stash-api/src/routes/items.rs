//! Owner-scoped item routes
//!
//! The authenticated owner id always comes from the `RequireAuth`
//! extractor, never from the request body or path.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use stash_db::{NewItem, UpdateItem};
use tracing::debug;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{CreateItemRequest, ItemResponse, UpdateItemRequest};

/// GET /items
async fn list_items(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ItemResponse>>>, ApiError> {
    let items = state.db.list_items(user.id).await?;

    Ok(Json(ApiResponse::with_data(
        "Items retrieved successfully",
        items.into_iter().map(ItemResponse::from).collect(),
    )))
}

/// POST /items
async fn create_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponse>>), ApiError> {
    if request.title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    debug!("Creating item for user: {}", user.username);

    let item = state
        .db
        .insert_item(NewItem {
            title: request.title,
            description: request.description.unwrap_or_default(),
            owner_id: user.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data(
            "Item created successfully",
            ItemResponse::from(item),
        )),
    ))
}

/// PUT /items/{id}
async fn update_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    debug!("Updating item {} for user: {}", id, user.username);

    let item = state
        .db
        .update_item(
            user.id,
            id,
            UpdateItem {
                title: request.title,
                description: request.description,
                completed: request.completed,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(ApiResponse::with_data(
        "Item updated successfully",
        ItemResponse::from(item),
    )))
}

/// DELETE /items/{id}
async fn delete_item(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse>, ApiError> {
    debug!("Deleting item {} for user: {}", id, user.username);

    let deleted = state.db.delete_item(user.id, id).await?;

    if deleted {
        Ok(Json(ApiResponse::message("Item deleted successfully")))
    } else {
        Err(ApiError::NotFound("Item not found".to_string()))
    }
}

/// Create item routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items", post(create_item))
        .route("/items/{id}", put(update_item))
        .route("/items/{id}", delete(delete_item))
}
