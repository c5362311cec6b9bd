use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, Role, User},
    store::PgStore,
};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, is_active, \
                            currency, country, created_at, updated_at";

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Lookup by normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;
    /// All users, newest first.
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
    async fn set_user_status(&self, id: Uuid, is_active: bool) -> anyhow::Result<Option<User>>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> anyhow::Result<Option<User>>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, currency, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.currency)
        .bind(&new.country)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn set_user_status(&self, id: Uuid, is_active: bool) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_active = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET role = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
