//! Storage handle shared by every request.
//!
//! Each domain module declares the queries it needs as an async trait in its
//! own `repo.rs`, and implements that trait for [`PgStore`]. [`Store`] bundles
//! those traits so handlers can hold a single `Arc<dyn Store>`.

use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::info;

use crate::{
    admin::repo::AdminRepo, analytics::repo::AnalyticsRepo, auth::repo::UserRepo,
    categories::repo::CategoryRepo, config::DatabaseConfig, transactions::repo::TransactionRepo,
};

#[cfg(test)]
pub mod memory;

pub trait Store:
    UserRepo + CategoryRepo + TransactionRepo + AnalyticsRepo + AdminRepo + Send + Sync
{
}

impl<T> Store for T where
    T: UserRepo + CategoryRepo + TransactionRepo + AnalyticsRepo + AdminRepo + Send + Sync
{
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Self> {
        let mut options = PgConnectOptions::from_str(&cfg.url).context("parse DATABASE_URL")?;
        if let Some(name) = &cfg.name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_with(options)
            .await
            .context("connect to database")?;
        info!(max_connections = cfg.max_connections, "database pool ready");
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}
