use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Category, CategoryPatch, NewCategory};
use crate::{store::PgStore, types::EntryType};

const CATEGORY_COLUMNS: &str = "id, name, icon, color, type, is_active, created_at";

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Active categories sorted by name, optionally filtered by type.
    async fn list_categories(&self, kind: Option<EntryType>) -> anyhow::Result<Vec<Category>>;
    /// Any category, active or not.
    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn create_category(&self, new: NewCategory) -> anyhow::Result<Category>;
    async fn update_category(&self, id: Uuid, patch: CategoryPatch)
        -> anyhow::Result<Option<Category>>;
    /// Soft delete. Returns false when the id is unknown.
    async fn deactivate_category(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Count of all rows, including inactive ones.
    async fn count_categories(&self) -> anyhow::Result<i64>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn list_categories(&self, kind: Option<EntryType>) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM categories
            WHERE is_active AND ($1::text IS NULL OR type = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_category(&self, new: NewCategory) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, icon, color, type)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.icon)
        .bind(&new.color)
        .bind(new.kind.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET
                name  = COALESCE($2, name),
                icon  = COALESCE($3, icon),
                color = COALESCE($4, color),
                type  = COALESCE($5, type)
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.icon)
        .bind(patch.color)
        .bind(patch.kind.map(|k| k.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn deactivate_category(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE categories SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_categories(&self) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
