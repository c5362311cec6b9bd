use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{categories::repo_types::Category, types::EntryType};

/// Transaction record as stored.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: EntryType,
    #[serde(with = "crate::types::entry_date")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Transaction with its category resolved. The category is absent only when
/// the referenced row no longer exists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Option<Category>,
}

/// Flat row produced by the `transactions LEFT JOIN categories` queries.
#[derive(Debug, FromRow)]
pub(crate) struct TransactionJoinRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub cat_id: Option<Uuid>,
    pub cat_name: Option<String>,
    pub cat_icon: Option<String>,
    pub cat_color: Option<String>,
    pub cat_type: Option<String>,
    pub cat_is_active: Option<bool>,
    pub cat_created_at: Option<OffsetDateTime>,
}

impl TryFrom<TransactionJoinRow> for TransactionWithCategory {
    type Error = crate::types::UnknownVariant;

    fn try_from(r: TransactionJoinRow) -> Result<Self, Self::Error> {
        let category = match (
            r.cat_id,
            r.cat_name,
            r.cat_icon,
            r.cat_color,
            r.cat_type,
            r.cat_is_active,
            r.cat_created_at,
        ) {
            (
                Some(id),
                Some(name),
                Some(icon),
                Some(color),
                Some(kind),
                Some(is_active),
                Some(created_at),
            ) => Some(Category {
                id,
                name,
                icon,
                color,
                kind: EntryType::try_from(kind)?,
                is_active,
                created_at,
            }),
            _ => None,
        };

        Ok(Self {
            transaction: Transaction {
                id: r.id,
                user_id: r.user_id,
                category_id: r.category_id,
                amount: r.amount,
                description: r.description,
                kind: EntryType::try_from(r.kind)?,
                date: r.date,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            category,
        })
    }
}

/// Fields needed to insert a transaction. The owner comes from the caller.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub kind: EntryType,
    pub date: Date,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub category_id: Option<Uuid>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub kind: Option<EntryType>,
    pub date: Option<Date>,
}
