use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{
    dto::{CreateCategoryRequest, ListCategoriesQuery, UpdateCategoryRequest},
    repo::CategoryRepo,
    repo_types::Category,
};
use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            patch(update_category).delete(delete_category),
        )
}

#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
    _caller: AuthUser,
    AppQuery(q): AppQuery<ListCategoriesQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories(q.kind).await?))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let payload = payload.normalized();
    payload.validate()?;
    let category = state.store.create_category(payload.into()).await?;
    info!(category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip_all, fields(admin_id = %admin.id, %id))]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let payload = payload.normalized();
    payload.validate()?;
    state
        .store
        .update_category(id, payload.into())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Category not found".into()))
}

#[instrument(skip_all, fields(admin_id = %admin.id, %id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.deactivate_category(id).await? {
        return Err(ApiError::NotFound("Category not found".into()));
    }
    info!("category deactivated");
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
