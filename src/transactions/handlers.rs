use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{
    dto::{CreateTransactionRequest, Pagination, UpdateTransactionRequest},
    export::{attachment_name, render_csv, EXPORT_LIMIT},
    repo::TransactionRepo,
    repo_types::{Transaction, TransactionWithCategory},
};
use crate::{
    auth::{extractors::AuthUser, repo::UserRepo},
    categories::repo::CategoryRepo,
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/export/csv", get(export_csv))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
}

fn not_found() -> ApiError {
    ApiError::NotFound("Transaction not found".into())
}

async fn ensure_category(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    match state.store.find_category(id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::invalid("categoryId", "Category does not exist")),
    }
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(p): AppQuery<Pagination>,
) -> Result<Json<Vec<TransactionWithCategory>>, ApiError> {
    p.validate()?;
    let rows = state
        .store
        .list_transactions(user.id, p.limit, p.offset)
        .await?;
    Ok(Json(rows))
}

#[instrument(skip_all, fields(user_id = %user.id, %id))]
pub async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TransactionWithCategory>, ApiError> {
    state
        .store
        .find_transaction(id, user.id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let payload = payload.normalized();
    payload.validate()?;
    ensure_category(&state, payload.category_id).await?;

    let tx = state
        .store
        .create_transaction(payload.into_new(user.id))
        .await?;
    info!(transaction_id = %tx.id, kind = %tx.kind, "transaction created");
    Ok((StatusCode::CREATED, Json(tx)))
}

#[instrument(skip_all, fields(user_id = %user.id, %id))]
pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let payload = payload.normalized();
    payload.validate()?;
    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id).await?;
    }

    state
        .store
        .update_transaction(id, user.id, payload.into())
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip_all, fields(user_id = %user.id, %id))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete_transaction(id, user.id).await? {
        return Err(not_found());
    }
    info!("transaction deleted");
    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn export_csv(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let currency = state
        .store
        .find_user(user.id)
        .await?
        .map(|u| u.currency)
        .unwrap_or_else(|| "USD".to_string());
    let rows = state
        .store
        .list_transactions(user.id, EXPORT_LIMIT, 0)
        .await?;
    let body = render_csv(&rows, &currency)?;
    info!(rows = rows.len(), "transactions exported");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_name(OffsetDateTime::now_utc().date())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
