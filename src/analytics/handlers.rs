use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use validator::Validate;

use super::{
    services::{self, CategoryExpense, UserStats},
    window::{MonthWindow, PeriodQuery},
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::AppQuery,
    state::AppState,
    transactions::{repo::TransactionRepo, repo_types::TransactionWithCategory},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/stats", get(stats))
        .route("/analytics/recent-transactions", get(recent_transactions))
        .route("/analytics/category-expenses", get(category_expenses))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecentQuery {
    #[serde(default = "default_recent")]
    #[validate(range(min = 1, max = 1000, message = "Limit must be between 1 and 1000"))]
    pub limit: i64,
}

fn default_recent() -> i64 {
    5
}

fn window_for(q: &PeriodQuery) -> Result<MonthWindow, ApiError> {
    let window = MonthWindow::resolve(q, OffsetDateTime::now_utc().date())?;
    debug!(
        start = %window.start_instant(),
        end = %window.end_instant(),
        "analytics window"
    );
    Ok(window)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(q): AppQuery<PeriodQuery>,
) -> Result<Json<UserStats>, ApiError> {
    let window = window_for(&q)?;
    Ok(Json(services::user_stats(state.store.as_ref(), user.id, window).await))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn recent_transactions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(q): AppQuery<RecentQuery>,
) -> Result<Json<Vec<TransactionWithCategory>>, ApiError> {
    q.validate()?;
    let rows = state.store.list_transactions(user.id, q.limit, 0).await?;
    Ok(Json(rows))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn category_expenses(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(q): AppQuery<PeriodQuery>,
) -> Result<Json<Vec<CategoryExpense>>, ApiError> {
    let window = window_for(&q)?;
    Ok(Json(
        services::category_expenses(state.store.as_ref(), user.id, window).await,
    ))
}
