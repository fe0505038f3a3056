use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        extractors::CurrentUser,
        repo_types::SessionUser,
    },
    error::reject,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionUser>), (StatusCode, String)> {
    let user = state
        .identity
        .register(
            &payload.email,
            &payload.password,
            &payload.first_name,
            &payload.last_name,
            payload.role,
        )
        .await
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionUser>, (StatusCode, String)> {
    state
        .identity
        .login(&payload.email, &payload.password)
        .await
        .map(Json)
        .map_err(reject)
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.identity.logout().await;
    StatusCode::NO_CONTENT
}

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}
