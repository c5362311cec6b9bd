use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::window::MonthWindow;
use crate::{categories::repo_types::Category, store::PgStore, types::EntryType};

#[async_trait]
pub trait AnalyticsRepo: Send + Sync {
    /// Per-type sums for one user, restricted to `window` when given.
    /// Types with no rows are omitted.
    async fn totals_by_type(
        &self,
        user_id: Uuid,
        window: Option<MonthWindow>,
    ) -> anyhow::Result<Vec<(EntryType, Decimal)>>;

    /// Expense sums per category inside the window, largest first. Inactive
    /// categories are included.
    async fn expenses_by_category(
        &self,
        user_id: Uuid,
        window: MonthWindow,
    ) -> anyhow::Result<Vec<(Category, Decimal)>>;
}

#[derive(FromRow)]
struct CategorySumRow {
    id: Uuid,
    name: String,
    icon: String,
    color: String,
    #[sqlx(rename = "type")]
    kind: String,
    is_active: bool,
    created_at: OffsetDateTime,
    amount: Decimal,
}

#[async_trait]
impl AnalyticsRepo for PgStore {
    async fn totals_by_type(
        &self,
        user_id: Uuid,
        window: Option<MonthWindow>,
    ) -> anyhow::Result<Vec<(EntryType, Decimal)>> {
        let rows: Vec<(String, Decimal)> = sqlx::query_as(
            r#"
            SELECT type, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = $1
              AND ($2::date IS NULL OR date BETWEEN $2 AND $3)
            GROUP BY type
            "#,
        )
        .bind(user_id)
        .bind(window.map(|w| w.start))
        .bind(window.map(|w| w.end))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(kind, sum)| -> anyhow::Result<_> {
                Ok((EntryType::try_from(kind)?, sum))
            })
            .collect()
    }

    async fn expenses_by_category(
        &self,
        user_id: Uuid,
        window: MonthWindow,
    ) -> anyhow::Result<Vec<(Category, Decimal)>> {
        let rows = sqlx::query_as::<_, CategorySumRow>(
            r#"
            SELECT c.id, c.name, c.icon, c.color, c.type, c.is_active, c.created_at,
                   SUM(t.amount) AS amount
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = $1
              AND t.type = 'expense'
              AND t.date BETWEEN $2 AND $3
            GROUP BY c.id
            ORDER BY SUM(t.amount) DESC, MIN(t.created_at) ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> anyhow::Result<_> {
                let category = Category {
                    id: r.id,
                    name: r.name,
                    icon: r.icon,
                    color: r.color,
                    kind: EntryType::try_from(r.kind)?,
                    is_active: r.is_active,
                    created_at: r.created_at,
                };
                Ok((category, r.amount))
            })
            .collect()
    }
}

