//! Stash Authentication
//!
//! This crate provides password hashing and JWT-based
//! authentication for Stash.

pub mod error;
pub mod jwt;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
