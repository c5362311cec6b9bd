use time::Date;

use super::repo_types::TransactionWithCategory;
use crate::types::entry_date;

/// Export row cap, matching the largest list page.
pub const EXPORT_LIMIT: i64 = 1000;

const HEADER: [&str; 6] = ["Date", "Description", "Category", "Type", "Amount", "Currency"];

/// Renders transactions as CSV, one row per transaction, in the given order.
pub fn render_csv(rows: &[TransactionWithCategory], currency: &str) -> anyhow::Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    for row in rows {
        let tx = &row.transaction;
        let category = row
            .category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");
        wtr.write_record([
            entry_date::format(tx.date).as_str(),
            tx.description.as_str(),
            category,
            tx.kind.as_str(),
            tx.amount.normalize().to_string().as_str(),
            currency,
        ])?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flush csv: {}", e.error()))
}

pub fn attachment_name(today: Date) -> String {
    format!("transactions-{}.csv", entry_date::format(today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        categories::repo_types::Category, transactions::repo_types::Transaction, types::EntryType,
    };
    use rust_decimal_macros::dec;
    use time::{macros::date, OffsetDateTime};
    use uuid::Uuid;

    fn row(description: &str, category: Option<&str>) -> TransactionWithCategory {
        let now = OffsetDateTime::UNIX_EPOCH;
        let category_id = Uuid::new_v4();
        TransactionWithCategory {
            transaction: Transaction {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                category_id,
                amount: dec!(12.50),
                description: description.into(),
                kind: EntryType::Expense,
                date: date!(2024 - 03 - 05),
                created_at: now,
                updated_at: now,
            },
            category: category.map(|name| Category {
                id: category_id,
                name: name.into(),
                icon: "Car".into(),
                color: "#000".into(),
                kind: EntryType::Expense,
                is_active: true,
                created_at: now,
            }),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let out = render_csv(&[row("Bus ticket", Some("Transportation"))], "EUR").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Date,Description,Category,Type,Amount,Currency\n\
             2024-03-05,Bus ticket,Transportation,expense,12.5,EUR\n"
        );
    }

    #[test]
    fn quotes_commas_and_quotes_in_description() {
        let out = render_csv(&[row(r#"Dinner, "fancy""#, None)], "USD").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#""Dinner, ""fancy""",Unknown,expense"#));
    }

    #[test]
    fn empty_export_is_header_only() {
        let text = String::from_utf8(render_csv(&[], "USD").unwrap()).unwrap();
        assert_eq!(text, "Date,Description,Category,Type,Amount,Currency\n");
    }

    #[test]
    fn filename_uses_iso_date() {
        assert_eq!(attachment_name(date!(2024 - 12 - 01)), "transactions-2024-12-01.csv");
    }
}
