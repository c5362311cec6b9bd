//! Aggregates computed on demand from per-type and per-category sums.
//!
//! Store failures never reach the client here: stats degrade to zeros and the
//! breakdown to an empty list, with the failure logged.

use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use super::{repo::AnalyticsRepo, window::MonthWindow};
use crate::{categories::repo_types::Category, types::EntryType};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_expenses: Decimal,
    pub savings_rate: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryExpense {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub percentage: i64,
}

/// Rounds half up toward positive infinity: `floor(x + 0.5)`.
pub fn round_percent(x: Decimal) -> i64 {
    (x + dec!(0.5)).floor().to_i64().unwrap_or(0)
}

fn sum_of(totals: &[(EntryType, Decimal)], kind: EntryType) -> Decimal {
    totals
        .iter()
        .filter(|(k, _)| *k == kind)
        .map(|(_, v)| *v)
        .sum()
}

pub fn build_stats(monthly: &[(EntryType, Decimal)], all_time: &[(EntryType, Decimal)]) -> UserStats {
    let monthly_income = sum_of(monthly, EntryType::Income);
    let monthly_expenses = sum_of(monthly, EntryType::Expense);
    let total_income = sum_of(all_time, EntryType::Income);
    let total_expenses = sum_of(all_time, EntryType::Expense);

    let savings_rate = if monthly_income > Decimal::ZERO {
        round_percent((monthly_income - monthly_expenses) / monthly_income * dec!(100))
    } else {
        0
    };

    UserStats {
        total_balance: total_income - total_expenses,
        monthly_income,
        monthly_expenses,
        savings_rate,
        total_income,
        total_expenses,
    }
}

/// Sorts by amount descending (stable) and attaches each share of the total.
pub fn build_breakdown(mut rows: Vec<(Category, Decimal)>) -> Vec<CategoryExpense> {
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    let total: Decimal = rows.iter().map(|(_, amount)| *amount).sum();

    rows.into_iter()
        .map(|(category, amount)| {
            let percentage = if total.is_zero() {
                0
            } else {
                round_percent(amount / total * dec!(100))
            };
            CategoryExpense {
                category,
                amount,
                percentage,
            }
        })
        .collect()
}

pub async fn user_stats<R>(repo: &R, user_id: Uuid, window: MonthWindow) -> UserStats
where
    R: AnalyticsRepo + ?Sized,
{
    let monthly = repo.totals_by_type(user_id, Some(window)).await;
    let all_time = repo.totals_by_type(user_id, None).await;
    match (monthly, all_time) {
        (Ok(monthly), Ok(all_time)) => build_stats(&monthly, &all_time),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, %user_id, "stats query failed, returning zeros");
            UserStats::default()
        }
    }
}

pub async fn category_expenses<R>(repo: &R, user_id: Uuid, window: MonthWindow) -> Vec<CategoryExpense>
where
    R: AnalyticsRepo + ?Sized,
{
    match repo.expenses_by_category(user_id, window).await {
        Ok(rows) => build_breakdown(rows),
        Err(e) => {
            error!(error = %e, %user_id, "category breakdown failed, returning empty list");
            Vec::new()
        }
    }
}
