//! Request/Response DTOs

use serde::{Deserialize, Serialize};
use stash_db::{Item, User};

// ==================== Auth Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public user identity (never the password hash)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Token plus identity returned by register and login
#[derive(Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: UserResponse,
}

// ==================== Item Types ====================

/// Create item request
#[derive(Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Update item request (all fields optional)
#[derive(Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Item response
#[derive(Serialize)]
pub struct ItemResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub owner_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            completed: item.completed,
            owner_id: item.owner_id,
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}
