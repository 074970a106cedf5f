//! Full-page handlers.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::warn;

use crate::portico::{
    session::Identity,
    views::{self, PageUser},
};
use crate::users::UserService;

pub async fn home(
    identity: Extension<Identity>,
    users: Extension<UserService>,
) -> impl IntoResponse {
    let user = current_user(&identity, &users).await;
    Html(views::home(user.as_ref()))
}

pub async fn register(
    identity: Extension<Identity>,
    users: Extension<UserService>,
) -> impl IntoResponse {
    let user = current_user(&identity, &users).await;
    Html(views::register(user.as_ref()))
}

pub async fn login(
    identity: Extension<Identity>,
    users: Extension<UserService>,
) -> impl IntoResponse {
    let user = current_user(&identity, &users).await;
    Html(views::login(user.as_ref()))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(views::not_found()))
}

/// Resolve the public fields of the signed-in user, if any.
///
/// A lookup failure renders the page as anonymous instead of failing it.
async fn current_user(identity: &Identity, users: &UserService) -> Option<PageUser> {
    let email = identity.email()?;
    match users.get_by_email(email).await {
        Ok(Some(user)) => Some(PageUser {
            email: user.email,
            name: user.name,
        }),
        Ok(None) => None,
        Err(err) => {
            warn!("failed to load user for session email: {err}");
            None
        }
    }
}
