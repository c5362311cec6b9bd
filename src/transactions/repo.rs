use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{
    NewTransaction, Transaction, TransactionJoinRow, TransactionPatch, TransactionWithCategory,
};
use crate::store::PgStore;

const TRANSACTION_COLUMNS: &str =
    "id, user_id, category_id, amount, description, type, date, created_at, updated_at";

const JOINED_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.category_id, t.amount, t.description, t.type, t.date,
           t.created_at, t.updated_at,
           c.id AS cat_id, c.name AS cat_name, c.icon AS cat_icon, c.color AS cat_color,
           c.type AS cat_type, c.is_active AS cat_is_active, c.created_at AS cat_created_at
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

#[async_trait]
pub trait TransactionRepo: Send + Sync {
    /// Owner's transactions, newest date first, with categories resolved.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<TransactionWithCategory>>;
    async fn find_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<TransactionWithCategory>>;
    async fn create_transaction(&self, new: NewTransaction) -> anyhow::Result<Transaction>;
    async fn update_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: TransactionPatch,
    ) -> anyhow::Result<Option<Transaction>>;
    /// Hard delete scoped to the owner. Returns false when nothing matched.
    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
}

fn resolve(rows: Vec<TransactionJoinRow>) -> anyhow::Result<Vec<TransactionWithCategory>> {
    rows.into_iter()
        .map(|r| TransactionWithCategory::try_from(r).map_err(anyhow::Error::from))
        .collect()
}

#[async_trait]
impl TransactionRepo for PgStore {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<TransactionWithCategory>> {
        let rows = sqlx::query_as::<_, TransactionJoinRow>(&format!(
            r#"
            {JOINED_SELECT}
            WHERE t.user_id = $1
            ORDER BY t.date DESC, t.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        resolve(rows)
    }

    async fn find_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<TransactionWithCategory>> {
        let row = sqlx::query_as::<_, TransactionJoinRow>(&format!(
            "{JOINED_SELECT} WHERE t.id = $1 AND t.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(TransactionWithCategory::try_from).transpose()?)
    }

    async fn create_transaction(&self, new: NewTransaction) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (user_id, category_id, amount, description, type, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.category_id)
        .bind(new.amount)
        .bind(&new.description)
        .bind(new.kind.as_str())
        .bind(new.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: TransactionPatch,
    ) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions SET
                category_id = COALESCE($3, category_id),
                amount      = COALESCE($4, amount),
                description = COALESCE($5, description),
                type        = COALESCE($6, type),
                date        = COALESCE($7, date),
                updated_at  = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.category_id)
        .bind(patch.amount)
        .bind(patch.description)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
