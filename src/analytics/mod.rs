pub mod handlers;
pub mod repo;
pub mod services;
pub mod window;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
