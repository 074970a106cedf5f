//! Form endpoints for registration, login, and logout.
//!
//! Successful register/login responses carry no body: they set the session
//! and signal the client to navigate via the `HX-Redirect` header with 204.

use axum::{
    extract::{rejection::FormRejection, Extension},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, warn};

use super::{validate_login, validate_registration};
use crate::portico::{session::SESSION_EMAIL_KEY, views};
use crate::users::{UserError, UserService};

const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn api_register(
    session: Session,
    users: Extension<UserService>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return fragment(StatusCode::BAD_REQUEST, "Malformed form data.");
    };

    let errors = validate_registration(&form.name, &form.email, &form.password);
    if !errors.is_empty() {
        return fragment(StatusCode::UNPROCESSABLE_ENTITY, &errors.join(" "));
    }

    match users.register(&form.name, &form.email, &form.password).await {
        Ok(user) => signed_in(&session, &user.email).await,
        Err(UserError::EmailAlreadyExists) => fragment(
            StatusCode::CONFLICT,
            "An account with this email already exists.",
        ),
        Err(err) => {
            error!("registration failed: {err}");
            fragment(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn api_login(
    session: Session,
    users: Extension<UserService>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return fragment(StatusCode::BAD_REQUEST, "Malformed form data.");
    };

    let errors = validate_login(&form.email, &form.password);
    if !errors.is_empty() {
        return fragment(StatusCode::UNPROCESSABLE_ENTITY, &errors.join(" "));
    }

    match users.authenticate(&form.email, &form.password).await {
        Ok(user) => signed_in(&session, &user.email).await,
        Err(UserError::InvalidCredentials) => {
            warn!(email = %form.email, "login failed: invalid credentials");
            fragment(StatusCode::UNAUTHORIZED, "Invalid email or password.")
        }
        Err(err) => {
            error!("login failed: {err}");
            fragment(StatusCode::INTERNAL_SERVER_ERROR, "Login failed.")
        }
    }
}

pub async fn logout(session: Session) -> Redirect {
    // Clearing a session that does not exist is a no-op.
    if let Err(err) = session.flush().await {
        error!("session flush failed: {err}");
    }
    // 303 See Other back to the home page.
    Redirect::to("/")
}

/// Record the authenticated email in the session and tell the HTMX client to
/// navigate home. A session write failure is a hard 500.
async fn signed_in(session: &Session, email: &str) -> Response {
    if let Err(err) = session.insert(SESSION_EMAIL_KEY, email).await {
        error!("session write failed: {err}");
        return fragment(StatusCode::INTERNAL_SERVER_ERROR, "Session error.");
    }

    let mut headers = HeaderMap::new();
    headers.insert(HX_REDIRECT, HeaderValue::from_static("/"));
    (StatusCode::NO_CONTENT, headers).into_response()
}

fn fragment(status: StatusCode, message: &str) -> Response {
    (status, Html(views::auth_result(status.is_success(), message))).into_response()
}
