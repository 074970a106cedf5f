//! End-to-end tests for the HTTP surface: pages, form endpoints, and the
//! session round-trip. Sessions use the in-memory store and users an
//! in-memory repository, so no database is needed.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;
use tower_sessions::{
    session::{Id, Record},
    session_store, MemoryStore, SessionManagerLayer, SessionStore,
};

use portico::portico::app;
use portico::users::{test_support::InMemoryRepository, UserService};

/// Session store whose backend is down: every operation fails.
#[derive(Debug, Clone, Default)]
struct FailingStore;

fn backend_down() -> session_store::Error {
    session_store::Error::Backend("session backend down".to_string())
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn save(&self, _record: &Record) -> session_store::Result<()> {
        Err(backend_down())
    }

    async fn load(&self, _id: &Id) -> session_store::Result<Option<Record>> {
        Err(backend_down())
    }

    async fn delete(&self, _id: &Id) -> session_store::Result<()> {
        Err(backend_down())
    }
}

fn test_app() -> Router {
    let users = UserService::new(Arc::new(InMemoryRepository::default())).with_cost(4);
    let sessions = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    app(users, sessions)
}

/// One user service over two apps: a healthy one to register through, and
/// one whose session store always fails.
fn healthy_and_broken_apps() -> (Router, Router) {
    let users = UserService::new(Arc::new(InMemoryRepository::default())).with_cost(4);
    let healthy = app(
        users.clone(),
        SessionManagerLayer::new(MemoryStore::default()).with_secure(false),
    );
    let broken = app(users, SessionManagerLayer::new(FailingStore).with_secure(false));
    (healthy, broken)
}

fn form_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// First `name=value` pair of the response's session cookie.
fn session_cookie(response: &Response) -> String {
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("expected a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register_alice(app: &Router) -> Response {
    app.clone()
        .oneshot(form_post(
            "/api/register",
            "name=Alice&email=alice%40example.com&password=secret-password",
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn home_renders_anonymous() {
    let app = test_app();
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Log in"));
    assert!(body.contains("Register"));
}

#[tokio::test]
async fn form_pages_render() {
    let app = test_app();
    for path in ["/login", "/register"] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<form"));
    }
}

#[tokio::test]
async fn not_found_page_and_fallback() {
    let app = test_app();

    let response = app.clone().oneshot(get("/404")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("404"));

    let response = app.oneshot(get("/no-such-page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_rejects_invalid_forms() {
    let app = test_app();

    // password below the 6-character minimum
    let response = app
        .clone()
        .oneshot(form_post(
            "/api/register",
            "name=Alice&email=alice%40example.com&password=12345",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Password must be"));

    // blank name
    let response = app
        .clone()
        .oneshot(form_post(
            "/api/register",
            "name=&email=alice%40example.com&password=123456",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Name must not be blank"));

    // malformed email
    let response = app
        .oneshot(form_post(
            "/api/register",
            "name=Alice&email=nope&password=123456",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_rejects_malformed_body() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/register")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Alice"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_signals_redirect_and_authenticates_session() {
    let app = test_app();

    let response = register_alice(&app).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get("hx-redirect").unwrap().to_str().unwrap(),
        "/"
    );

    let cookie = session_cookie(&response);
    let response = app.oneshot(get_with_cookie("/", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("alice@example.com"));
    assert!(body.contains("Alice"));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();

    let response = register_alice(&app).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = register_alice(&app).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_string(response).await.contains("already exists"));
}

#[tokio::test]
async fn login_does_not_reveal_which_credential_was_wrong() {
    let app = test_app();
    register_alice(&app).await;

    let wrong_password = app
        .clone()
        .oneshot(form_post(
            "/api/login",
            "email=alice%40example.com&password=not-the-password",
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(form_post(
            "/api/login",
            "email=nobody%40example.com&password=secret-password",
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_string(wrong_password).await,
        body_string(unknown_email).await
    );
}

#[tokio::test]
async fn login_signals_redirect_and_authenticates_session() {
    let app = test_app();
    register_alice(&app).await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/api/login",
            "email=alice%40example.com&password=secret-password",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get("hx-redirect").unwrap().to_str().unwrap(),
        "/"
    );

    let cookie = session_cookie(&response);
    let response = app.oneshot(get_with_cookie("/", &cookie)).await.unwrap();
    assert!(body_string(response).await.contains("alice@example.com"));
}

#[tokio::test]
async fn logout_destroys_the_session() {
    let app = test_app();

    let response = register_alice(&app).await;
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/logout", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).unwrap().to_str().unwrap(),
        "/"
    );

    // The old cookie no longer authenticates.
    let response = app.oneshot(get_with_cookie("/", &cookie)).await.unwrap();
    let body = body_string(response).await;
    assert!(!body.contains("alice@example.com"));
    assert!(body.contains("Log in"));
}

#[tokio::test]
async fn logout_without_a_session_still_redirects() {
    let app = test_app();
    let response = app.oneshot(get("/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn session_read_failure_degrades_to_anonymous() {
    let (healthy, broken) = healthy_and_broken_apps();

    // A real session cookie, minted while the store was healthy.
    let response = register_alice(&healthy).await;
    let cookie = session_cookie(&response);

    let response = broken.oneshot(get_with_cookie("/", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Log in"));
    assert!(!body.contains("alice@example.com"));
}

#[tokio::test]
async fn session_write_failure_fails_login() {
    let (healthy, broken) = healthy_and_broken_apps();

    let response = register_alice(&healthy).await;
    let cookie = session_cookie(&response);

    // Credentials are valid; only the session backend is down.
    let mut request = form_post(
        "/api/login",
        "email=alice%40example.com&password=secret-password",
    );
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse().unwrap());
    let response = broken.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("hx-redirect").is_none());
}

#[tokio::test]
async fn health_reports_build_info() {
    let app = test_app();
    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    let body = body_string(response).await;
    assert!(body.contains("portico"));
}
