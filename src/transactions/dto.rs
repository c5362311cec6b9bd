use std::borrow::Cow;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::repo_types::{NewTransaction, TransactionPatch};
use crate::types::EntryType;

/// Largest value a `NUMERIC(14, 2)` column holds.
const MAX_AMOUNT: Decimal = dec!(999999999999.99);

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    let message = if amount.is_sign_negative() || amount.is_zero() {
        "Amount must be greater than 0"
    } else if *amount > MAX_AMOUNT {
        "Amount must not exceed 999999999999.99"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("range");
    err.message = Some(Cow::Borrowed(message));
    Err(err)
}

/// `?limit=&offset=` for the transaction list.
#[derive(Debug, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000, message = "Limit must be between 1 and 1000"))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Amounts are accepted as JSON numbers or numeric strings.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub category_id: Uuid,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(with = "crate::types::entry_date")]
    pub date: Date,
}

impl CreateTransactionRequest {
    /// Trims the description and rounds the amount to cents, as stored.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        self.amount = self.amount.round_dp(2);
        self
    }

    pub fn into_new(self, user_id: Uuid) -> NewTransaction {
        NewTransaction {
            user_id,
            category_id: self.category_id,
            amount: self.amount,
            description: self.description,
            kind: self.kind,
            date: self.date,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub category_id: Option<Uuid>,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Option<Decimal>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<EntryType>,
    #[serde(default, deserialize_with = "crate::types::entry_date::option::deserialize")]
    pub date: Option<Date>,
}

impl UpdateTransactionRequest {
    pub fn normalized(mut self) -> Self {
        self.description = self.description.map(|d| d.trim().to_string());
        self.amount = self.amount.map(|a| a.round_dp(2));
        self
    }
}

impl From<UpdateTransactionRequest> for TransactionPatch {
    fn from(r: UpdateTransactionRequest) -> Self {
        Self {
            category_id: r.category_id,
            amount: r.amount,
            description: r.description,
            kind: r.kind,
            date: r.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn create(body: &str) -> CreateTransactionRequest {
        serde_json::from_str::<CreateTransactionRequest>(body)
            .unwrap()
            .normalized()
    }

    #[test]
    fn accepts_numeric_and_string_amounts() {
        let id = Uuid::new_v4();
        let a = create(&format!(
            r#"{{"categoryId":"{id}","amount":12.5,"description":"Lunch","type":"expense","date":"2024-03-01"}}"#
        ));
        let b = create(&format!(
            r#"{{"categoryId":"{id}","amount":"12.50","description":"Lunch","type":"expense","date":"2024-03-01T09:00:00Z"}}"#
        ));
        assert_eq!(a.amount, dec!(12.5));
        assert_eq!(a.amount, b.amount);
        assert_eq!(a.date, date!(2024 - 03 - 01));
        assert_eq!(b.date, date!(2024 - 03 - 01));
        assert!(a.validate().is_ok());
    }

    #[test]
    fn rejects_zero_negative_and_sub_cent_amounts() {
        let id = Uuid::new_v4();
        for amount in ["0", "-5", "0.001"] {
            let req = create(&format!(
                r#"{{"categoryId":"{id}","amount":"{amount}","description":"x","type":"income","date":"2024-03-01"}}"#
            ));
            assert!(req.validate().is_err(), "amount {amount} should be rejected");
        }
    }

    #[test]
    fn amounts_beyond_column_precision_are_rejected() {
        let id = Uuid::new_v4();
        let at_limit = create(&format!(
            r#"{{"categoryId":"{id}","amount":"999999999999.99","description":"x","type":"income","date":"2024-03-01"}}"#
        ));
        assert!(at_limit.validate().is_ok());

        let over = create(&format!(
            r#"{{"categoryId":"{id}","amount":"10000000000000","description":"x","type":"income","date":"2024-03-01"}}"#
        ));
        let errs = over.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("amount"));

        let patch: UpdateTransactionRequest =
            serde_json::from_str(r#"{"amount":"1000000000000"}"#).unwrap();
        assert!(patch.normalized().validate().is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        let id = Uuid::new_v4();
        let req = create(&format!(
            r#"{{"categoryId":"{id}","amount":1,"description":"   ","type":"income","date":"2024-03-01"}}"#
        ));
        assert!(req.validate().is_err());
    }

    #[test]
    fn bad_date_fails_to_parse() {
        let id = Uuid::new_v4();
        let res = serde_json::from_str::<CreateTransactionRequest>(&format!(
            r#"{{"categoryId":"{id}","amount":1,"description":"x","type":"income","date":"03/01/2024"}}"#
        ));
        assert!(res.is_err());
    }

    #[test]
    fn patch_fields_are_optional() {
        let req: UpdateTransactionRequest = serde_json::from_str(r#"{"amount":3}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.date.is_none());

        let req: UpdateTransactionRequest = serde_json::from_str(r#"{"amount":0}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn pagination_bounds() {
        let ok: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!((ok.limit, ok.offset), (50, 0));
        assert!(ok.validate().is_ok());

        let too_big = Pagination { limit: 1001, offset: 0 };
        assert!(too_big.validate().is_err());
        let negative = Pagination { limit: 10, offset: -1 };
        assert!(negative.validate().is_err());
    }
}
