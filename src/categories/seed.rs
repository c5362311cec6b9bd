use tracing::info;

use super::{repo::CategoryRepo, repo_types::NewCategory};
use crate::types::EntryType;

const DEFAULTS: &[(&str, &str, &str, EntryType)] = &[
    ("Salary", "Briefcase", "#16a34a", EntryType::Income),
    ("Freelance", "User", "#059669", EntryType::Income),
    ("Investment", "TrendingUp", "#0d9488", EntryType::Income),
    ("Bonus", "Gift", "#0891b2", EntryType::Income),
    ("Other Income", "Plus", "#0284c7", EntryType::Income),
    ("Food & Dining", "UtensilsCrossed", "#dc2626", EntryType::Expense),
    ("Transportation", "Car", "#ea580c", EntryType::Expense),
    ("Shopping", "ShoppingBag", "#d97706", EntryType::Expense),
    ("Entertainment", "Gamepad2", "#ca8a04", EntryType::Expense),
    ("Bills & Utilities", "Receipt", "#65a30d", EntryType::Expense),
    ("Healthcare", "Heart", "#16a34a", EntryType::Expense),
    ("Education", "GraduationCap", "#0891b2", EntryType::Expense),
    ("Travel", "Plane", "#0284c7", EntryType::Expense),
    ("Home & Garden", "Home", "#7c3aed", EntryType::Expense),
    ("Other Expenses", "Minus", "#be123c", EntryType::Expense),
];

/// Inserts the default categories into an empty table. Returns how many rows
/// were written.
pub async fn seed_defaults<R>(repo: &R) -> anyhow::Result<usize>
where
    R: CategoryRepo + ?Sized,
{
    let existing = repo.count_categories().await?;
    if existing > 0 {
        info!(existing, "categories present, skipping seed");
        return Ok(0);
    }

    for (name, icon, color, kind) in DEFAULTS {
        repo.create_category(NewCategory {
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind: *kind,
        })
        .await?;
    }
    info!(count = DEFAULTS.len(), "seeded default categories");
    Ok(DEFAULTS.len())
}
