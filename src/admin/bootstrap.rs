use tracing::{info, warn};

use crate::auth::{dto::normalize_email, repo::UserRepo, repo_types::Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    Promoted,
    AlreadyAdmin,
    UnknownUser,
}

/// Grants the admin role to the account registered under `email`. The account
/// must already exist; nothing is created here.
pub async fn promote_admin<R>(users: &R, email: &str) -> anyhow::Result<Promotion>
where
    R: UserRepo + ?Sized,
{
    let email = normalize_email(email);
    let Some(user) = users.find_user_by_email(&email).await? else {
        warn!(%email, "ADMIN_EMAIL does not match a registered user");
        return Ok(Promotion::UnknownUser);
    };
    if user.role == Role::Admin {
        return Ok(Promotion::AlreadyAdmin);
    }

    users.set_user_role(user.id, Role::Admin).await?;
    info!(user_id = %user.id, %email, "promoted to admin");
    Ok(Promotion::Promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::repo_types::NewUser, store::memory::MemoryStore};

    async fn seeded(store: &MemoryStore, email: &str) -> uuid::Uuid {
        store
            .create_user(NewUser {
                email: email.into(),
                password_hash: "x".into(),
                first_name: "Root".into(),
                last_name: "User".into(),
                currency: "USD".into(),
                country: "US".into(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn promotes_existing_user_once() {
        let store = MemoryStore::default();
        let id = seeded(&store, "root@example.com").await;

        let first = promote_admin(&store, " Root@Example.com ").await.unwrap();
        assert_eq!(first, Promotion::Promoted);
        let user = store.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);

        let second = promote_admin(&store, "root@example.com").await.unwrap();
        assert_eq!(second, Promotion::AlreadyAdmin);
    }

    #[tokio::test]
    async fn unknown_email_changes_nothing() {
        let store = MemoryStore::default();
        let id = seeded(&store, "someone@example.com").await;

        let res = promote_admin(&store, "nobody@example.com").await.unwrap();
        assert_eq!(res, Promotion::UnknownUser);
        let user = store.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::User);
    }
}
