//! In-memory [`UserRepository`] shared by unit and integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use time::OffsetDateTime;

use super::{NewUser, User, UserError, UserRepository};

/// Mutex-guarded map keyed by email, so the uniqueness check and the insert
/// are atomic like the database constraint.
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<HashMap<String, User>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, UserError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&user.email) {
            return Err(UserError::EmailAlreadyExists);
        }
        let row = User {
            id: rows.len() as i64 + 1,
            email: user.email.clone(),
            name: user.name,
            password: user.password,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.insert(user.email, row.clone());
        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.rows.lock().unwrap().get(email).cloned())
    }
}
