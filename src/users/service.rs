//! Registration and authentication on top of the user repository.
//!
//! The service is the only place password hashes are produced or verified;
//! every `User` it returns has the password field cleared.

use std::sync::Arc;
use tracing::debug;

use super::{NewUser, User, UserError, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cost: u32,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor. Tests use a low cost to stay fast.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Create a new account. The pre-check returns a friendly error before
    /// hashing; the unique constraint remains the final arbiter, and both
    /// paths surface [`UserError::EmailAlreadyExists`].
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        if self.repo.get_by_email(email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let hashed = bcrypt::hash(password, self.cost)?;
        let created = self
            .repo
            .create_user(NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password: hashed,
            })
            .await?;

        debug!(email = %created.email, id = created.id, "user registered");

        Ok(scrub(created))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.repo.get_by_email(email).await?.map(scrub))
    }

    /// Verify credentials. Unknown email and wrong password both yield
    /// [`UserError::InvalidCredentials`] so callers cannot probe for
    /// account existence.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let Some(user) = self.repo.get_by_email(email).await? else {
            return Err(UserError::InvalidCredentials);
        };

        // bcrypt::verify is timing-safe.
        if !bcrypt::verify(password, &user.password)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(scrub(user))
    }
}

/// Drop the password hash before the value leaves the service.
fn scrub(mut user: User) -> User {
    user.password.clear();
    user
}
