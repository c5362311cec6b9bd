mod admin;
mod analytics;
mod app;
mod auth;
mod categories;
mod config;
mod error;
mod extract;
mod mailer;
mod state;
mod store;
mod transactions;
mod types;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "financeflow=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let state = AppState::init(config).await?;

    if let Err(e) = categories::seed::seed_defaults(state.store.as_ref()).await {
        tracing::warn!(error = %e, "category seeding failed; continuing");
    }
    if let Some(email) = state.config.admin_email.as_deref() {
        if let Err(e) = admin::bootstrap::promote_admin(state.store.as_ref(), email).await {
            tracing::warn!(error = %e, "admin bootstrap failed; continuing");
        }
    }

    let addr = state.config.bind_address();
    let app = app::build_app(state);
    app::serve(app, &addr).await
}
