//! Database access for user rows.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;

use super::{User, UserError};

/// Fields supplied by the service when inserting a new user.
/// `password` is already hashed by the time it reaches the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the row as persisted (store-assigned id and
    /// timestamp). A unique violation on `email` maps to
    /// [`UserError::EmailAlreadyExists`].
    async fn create_user(&self, user: NewUser) -> Result<User, UserError>;

    /// Single-row lookup by email. Absent is `Ok(None)`, not an error.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, UserError> {
        let query = r"
            INSERT INTO users (email, name, password)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password, created_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserError::EmailAlreadyExists
                } else {
                    UserError::Database(err)
                }
            })?;

        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password: row.get("password"),
            created_at: row.get("created_at"),
        })
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let query = r"
            SELECT id, email, name, password, created_at
            FROM users
            WHERE email = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password: row.get("password"),
            created_at: row.get("created_at"),
        }))
    }
}
