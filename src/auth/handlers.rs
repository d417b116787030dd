use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, UserResponse},
        error::AuthError,
        extractors::ValidJson,
        token,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    let user = state
        .users
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let user = state
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = token::issue();
    Ok(Json(LoginResponse {
        token: token.value,
        user,
        message: "Login successful",
        issued_at: token.issued_at,
    }))
}

/// Nothing is revoked server-side; the header is echoed back.
#[instrument(skip(headers))]
pub async fn logout(headers: HeaderMap) -> Json<LogoutResponse> {
    let token_invalidated = headers
        .get(AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_else(|| "none provided".to_string());
    info!("user logged out");
    Json(LogoutResponse {
        message: "Logout successful",
        token_invalidated,
    })
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AuthError> {
    Ok(Json(state.users.list_users().await?))
}
