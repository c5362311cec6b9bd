use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{AdminUserView, RoleRequest, StatusRequest},
    repo::{AdminRepo, AdminStats},
};
use crate::{
    auth::{extractors::AdminUser, repo::UserRepo},
    error::{ApiError, ApiResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/stats", get(stats))
        .route("/admin/users/:id/status", patch(set_status))
        .route("/admin/users/:id/role", patch(set_role))
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".into())
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<Vec<AdminUserView>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(AdminUserView::from).collect()))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<AdminStats>> {
    Ok(Json(state.store.admin_counts().await?))
}

#[instrument(skip_all, fields(admin_id = %admin.id, %id))]
pub async fn set_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<StatusRequest>,
) -> ApiResult<Json<AdminUserView>> {
    let user = state
        .store
        .set_user_status(id, body.is_active)
        .await?
        .ok_or_else(user_not_found)?;
    info!(is_active = user.is_active, "user status changed");
    Ok(Json(user.into()))
}

#[instrument(skip_all, fields(admin_id = %admin.id, %id))]
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<RoleRequest>,
) -> ApiResult<Json<AdminUserView>> {
    let role = body
        .parse()
        .ok_or_else(|| ApiError::invalid("role", "Role must be either \"user\" or \"admin\""))?;
    let user = state
        .store
        .set_user_role(id, role)
        .await?
        .ok_or_else(user_not_found)?;
    info!(role = user.role.as_str(), "user role changed");
    Ok(Json(user.into()))
}
