//! User accounts: domain model, storage, and the service that owns
//! password hashing and verification.

pub mod repository;
pub mod service;
#[doc(hidden)]
pub mod test_support;

pub use repository::{NewUser, PgUserRepository, UserRepository};
pub use service::UserService;

use thiserror::Error;
use time::OffsetDateTime;

/// A persisted user row. The `password` field holds the bcrypt hash and is
/// cleared by the service before the value crosses the service boundary.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
