//! Session-backed identity resolution.
//!
//! Runs after the session layer on every request and turns the session's
//! `email` key into a typed [`Identity`] request extension, so handlers never
//! have to read the session map themselves.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;
use tracing::warn;

/// Key under which the authenticated email is stored in the session.
pub const SESSION_EMAIL_KEY: &str = "email";

/// Who is making the request, as resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { email: String },
}

impl Identity {
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User { email } => Some(email),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

/// Resolve the request's [`Identity`] and stash it in the extensions.
///
/// A session store failure degrades to anonymous rather than failing the
/// request; the error is logged.
pub async fn resolve_identity(session: Session, mut request: Request, next: Next) -> Response {
    let identity = match session.get::<String>(SESSION_EMAIL_KEY).await {
        Ok(Some(email)) if !email.is_empty() => Identity::User { email },
        Ok(_) => Identity::Anonymous,
        Err(err) => {
            warn!("session read failed, treating request as anonymous: {err}");
            Identity::Anonymous
        }
    };

    request.extensions_mut().insert(identity);

    next.run(request).await
}
