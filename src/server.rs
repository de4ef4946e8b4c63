//!
//! marquee HTTP server
//! -------------------
//! Axum-based HTTP API over the authentication core and the movie catalog.
//!
//! Responsibilities:
//! - Register/login endpoints backed by the `identity` module.
//! - Per-request context binding from the Authorization header.
//! - Catalog listing with the rating field gated on the bound principal.
//! - Startup seeding of the sample catalog and fixture accounts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::catalog::{sample_movies, Catalog, RandomRating, RatingSource};
use crate::identity::{bearer_token, Authenticator, Identity, RequestContext, Session};

/// Fixed sentinel token bound to the seeded `authenticated` account, for
/// operational testing against a fresh instance.
pub const WELL_KNOWN_TOKEN: &str = "00000000-0000-0000-0000-000000000000";

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Authenticator,
    pub catalog: Catalog,
    pub ratings: Arc<dyn RatingSource>,
}

/// Seed the sample catalog and the two fixture accounts: `anonymous` (empty
/// secret, no session) and `authenticated`/`test`, bound to the well-known
/// token.
pub fn seed_fixtures(auth: &Authenticator, catalog: &Catalog) {
    catalog.seed(sample_movies());
    auth.identities.seed(Identity {
        id: Uuid::new_v4().to_string(),
        display_name: "Anonymous user".to_string(),
        login_name: "anonymous".to_string(),
        secret: String::new(),
    });
    let authenticated = Identity {
        id: Uuid::new_v4().to_string(),
        display_name: "Authenticated user".to_string(),
        login_name: "authenticated".to_string(),
        secret: "test".to_string(),
    };
    auth.sessions.seed(Session {
        identity_id: authenticated.id.clone(),
        token: WELL_KNOWN_TOKEN.to_string(),
        active: true,
    });
    auth.identities.seed(authenticated);
}

/// Build a fully seeded state with the production rating source.
pub fn build_state() -> AppState {
    let auth = Authenticator::default();
    let catalog = Catalog::new();
    seed_fixtures(&auth, &catalog);
    AppState { auth, catalog, ratings: Arc::new(RandomRating) }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "marquee ok" }))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/movies", get(movies))
        .route("/users", get(users))
        .with_state(state)
}

/// Start the HTTP server bound to the given port.
pub async fn run_with_port(http_port: u16) -> anyhow::Result<()> {
    let state = build_state();
    info!(
        accounts = state.auth.identities.all().len(),
        "seeded sample catalog and fixture accounts"
    );

    let app = router(state);
    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Convenience entry point using the default port.
pub async fn run() -> anyhow::Result<()> {
    run_with_port(4000).await
}

#[derive(Debug, Deserialize)]
struct CredentialsPayload {
    username: String,
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> impl IntoResponse {
    // Registration never issues a token; callers log in separately.
    let identity = state.auth.register(&payload.username, &payload.password);
    (
        StatusCode::OK,
        Json(json!({"status":"ok","user_id": identity.id, "name": identity.display_name})),
    )
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> impl IntoResponse {
    match state.auth.login(&payload.username, &payload.password) {
        Ok((identity, session)) => (
            StatusCode::OK,
            Json(json!({
                "status":"ok",
                "token": session.token,
                "user_id": identity.id,
                "name": identity.display_name,
            })),
        ),
        Err(e) => {
            error!("login rejected: {e}");
            let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({"status":"unauthorized","error": e.code_str()})))
        }
    }
}

/// Extension over the reference behavior: revoke the presented bearer token.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = bearer_token(&headers);
    if token.is_empty() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"status":"unauthorized"})));
    }
    let revoked = state.auth.logout(&token);
    (StatusCode::OK, Json(json!({"status":"ok","revoked": revoked})))
}

async fn movies(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let ctx = RequestContext::bind(&state.auth, &headers);
    let movies = state.catalog.list(&ctx, state.ratings.as_ref());
    (StatusCode::OK, Json(json!({"status":"ok","movies": movies})))
}

/// Account listing, mirroring the original API surface: secrets are returned
/// as stored. Not hardened.
async fn users(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok","users": state.auth.identities.all()})))
}
