use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{info, info_span, Span};
use ulid::Ulid;

use crate::users::{PgUserRepository, UserService};

pub mod handlers;
pub mod session;
pub mod views;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// Routes only; the session and identity layers come from [`app`].
fn router() -> Router {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/register", get(handlers::pages::register))
        .route("/login", get(handlers::pages::login))
        .route("/404", get(handlers::pages::not_found))
        .route("/health", get(handlers::health::health))
        .route("/api/register", post(handlers::auth::api_register))
        .route("/api/login", post(handlers::auth::api_login))
        .route("/logout", get(handlers::auth::logout))
        .nest_service("/public", ServeDir::new("public"))
        .fallback(handlers::pages::not_found)
}

/// Assemble the application: routes behind the session layer and the
/// identity resolver. Integration tests call this with an in-memory store.
pub fn app<Store>(users: UserService, sessions: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    router()
        .layer(middleware::from_fn(session::resolve_identity))
        .layer(sessions)
        .layer(Extension(users))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: &str,
    session_ttl_minutes: i64,
    session_gc_seconds: u64,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Sessions live in the same database; expired rows are swept on an
    // interval instead of per-request.
    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to migrate session store")?;
    let deletion_task = tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(Duration::from_secs(session_gc_seconds)),
    );

    let sessions = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session_ttl_minutes,
        )));

    let users = UserService::new(Arc::new(PgUserRepository::new(pool.clone())));

    let app = app(users, sessions).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    deletion_task.abort();

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or("none", MatchedPath::as_str);

    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        matched_path,
        request_id
    )
}
