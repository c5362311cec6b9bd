use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        repo::UserRepo,
        services,
    },
    error::ApiError,
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/user", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let res = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(services::login(&state, payload).await?))
}

#[instrument(skip_all, fields(user_id = %ctx.id))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.store.find_user(ctx.id).await?.ok_or_else(|| {
        warn!("authenticated user vanished");
        ApiError::NotFound("User not found".into())
    })?;
    Ok(Json(PublicUser::from(user)))
}
