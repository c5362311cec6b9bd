use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;

use crate::store::PgStore;

/// Global counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub active_users: i64,
    /// Active categories only.
    pub total_categories: i64,
    pub total_transactions: i64,
}

#[async_trait]
pub trait AdminRepo: Send + Sync {
    async fn admin_counts(&self) -> anyhow::Result<AdminStats>;
}

#[async_trait]
impl AdminRepo for PgStore {
    async fn admin_counts(&self) -> anyhow::Result<AdminStats> {
        let stats = sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users)                    AS total_users,
                (SELECT COUNT(*) FROM users WHERE is_active)    AS active_users,
                (SELECT COUNT(*) FROM categories WHERE is_active) AS total_categories,
                (SELECT COUNT(*) FROM transactions)             AS total_transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
