//! In-process store used by unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    admin::repo::{AdminRepo, AdminStats},
    analytics::{repo::AnalyticsRepo, window::MonthWindow},
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, Role, User},
    },
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryPatch, NewCategory},
    },
    transactions::{
        repo::TransactionRepo,
        repo_types::{NewTransaction, Transaction, TransactionPatch, TransactionWithCategory},
    },
    types::EntryType,
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    categories: Mutex<Vec<Category>>,
    transactions: Mutex<Vec<Transaction>>,
}

impl MemoryStore {
    fn with_category(&self, tx: Transaction) -> TransactionWithCategory {
        let category = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == tx.category_id)
            .cloned();
        TransactionWithCategory {
            transaction: tx,
            category,
        }
    }

    fn update_user<F>(&self, id: Uuid, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id)?;
        f(user);
        user.updated_at = OffsetDateTime::now_utc();
        Some(user.clone())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
            anyhow::bail!("duplicate email {}", new.email);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            role: Role::User,
            is_active: true,
            currency: new.currency,
            country: new.country,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        // Newest first; pushes are chronological.
        Ok(self.users.lock().unwrap().iter().rev().cloned().collect())
    }

    async fn set_user_status(&self, id: Uuid, is_active: bool) -> anyhow::Result<Option<User>> {
        Ok(self.update_user(id, |u| u.is_active = is_active))
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> anyhow::Result<Option<User>> {
        Ok(self.update_user(id, |u| u.role = role))
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list_categories(&self, kind: Option<EntryType>) -> anyhow::Result<Vec<Category>> {
        let mut out: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_active && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_category(&self, new: NewCategory) -> anyhow::Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            icon: new.icon,
            color: new.color,
            kind: new.kind,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        self.categories.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> anyhow::Result<Option<Category>> {
        let mut categories = self.categories.lock().unwrap();
        let Some(c) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            c.name = name;
        }
        if let Some(icon) = patch.icon {
            c.icon = icon;
        }
        if let Some(color) = patch.color {
            c.color = color;
        }
        if let Some(kind) = patch.kind {
            c.kind = kind;
        }
        Ok(Some(c.clone()))
    }

    async fn deactivate_category(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut categories = self.categories.lock().unwrap();
        match categories.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_categories(&self) -> anyhow::Result<i64> {
        Ok(self.categories.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl TransactionRepo for MemoryStore {
    async fn list_transactions(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<TransactionWithCategory>> {
        let mut own: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(own
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|t| self.with_category(t))
            .collect())
    }

    async fn find_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<TransactionWithCategory>> {
        let tx = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned();
        Ok(tx.map(|t| self.with_category(t)))
    }

    async fn create_transaction(&self, new: NewTransaction) -> anyhow::Result<Transaction> {
        let now = OffsetDateTime::now_utc();
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            category_id: new.category_id,
            amount: new.amount,
            description: new.description,
            kind: new.kind,
            date: new.date,
            created_at: now,
            updated_at: now,
        };
        self.transactions.lock().unwrap().push(tx.clone());
        Ok(tx)
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: TransactionPatch,
    ) -> anyhow::Result<Option<Transaction>> {
        let mut txs = self.transactions.lock().unwrap();
        let Some(t) = txs.iter_mut().find(|t| t.id == id && t.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(category_id) = patch.category_id {
            t.category_id = category_id;
        }
        if let Some(amount) = patch.amount {
            t.amount = amount;
        }
        if let Some(description) = patch.description {
            t.description = description;
        }
        if let Some(kind) = patch.kind {
            t.kind = kind;
        }
        if let Some(date) = patch.date {
            t.date = date;
        }
        t.updated_at = OffsetDateTime::now_utc();
        Ok(Some(t.clone()))
    }

    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut txs = self.transactions.lock().unwrap();
        let before = txs.len();
        txs.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(txs.len() < before)
    }
}

#[async_trait]
impl AnalyticsRepo for MemoryStore {
    async fn totals_by_type(
        &self,
        user_id: Uuid,
        window: Option<MonthWindow>,
    ) -> anyhow::Result<Vec<(EntryType, Decimal)>> {
        let txs = self.transactions.lock().unwrap();
        let mut out: Vec<(EntryType, Decimal)> = Vec::new();
        for t in txs
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| window.map_or(true, |w| w.contains(t.date)))
        {
            match out.iter_mut().find(|(k, _)| *k == t.kind) {
                Some((_, sum)) => *sum += t.amount,
                None => out.push((t.kind, t.amount)),
            }
        }
        Ok(out)
    }

    async fn expenses_by_category(
        &self,
        user_id: Uuid,
        window: MonthWindow,
    ) -> anyhow::Result<Vec<(Category, Decimal)>> {
        let txs = self.transactions.lock().unwrap();
        let categories = self.categories.lock().unwrap();
        let mut out: Vec<(Category, Decimal)> = Vec::new();
        for t in txs.iter().filter(|t| {
            t.user_id == user_id && t.kind == EntryType::Expense && window.contains(t.date)
        }) {
            let Some(category) = categories.iter().find(|c| c.id == t.category_id) else {
                continue;
            };
            match out.iter_mut().find(|(c, _)| c.id == category.id) {
                Some((_, sum)) => *sum += t.amount,
                None => out.push((category.clone(), t.amount)),
            }
        }
        out.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(out)
    }
}

#[async_trait]
impl AdminRepo for MemoryStore {
    async fn admin_counts(&self) -> anyhow::Result<AdminStats> {
        let users = self.users.lock().unwrap();
        Ok(AdminStats {
            total_users: users.len() as i64,
            active_users: users.iter().filter(|u| u.is_active).count() as i64,
            total_categories: self
                .categories
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.is_active)
                .count() as i64,
            total_transactions: self.transactions.lock().unwrap().len() as i64,
        })
    }
}
