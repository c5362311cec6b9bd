use serde::Deserialize;
use validator::Validate;

use super::repo_types::{CategoryPatch, NewCategory};
use crate::types::EntryType;

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    #[serde(rename = "type")]
    pub kind: Option<EntryType>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Icon is required"))]
    pub icon: String,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
}

impl CreateCategoryRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(r: CreateCategoryRequest) -> Self {
        Self {
            name: r.name,
            icon: r.icon,
            color: r.color,
            kind: r.kind,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Icon is required"))]
    pub icon: Option<String>,
    #[validate(length(min = 1, message = "Color is required"))]
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<EntryType>,
}

impl UpdateCategoryRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self
    }
}

impl From<UpdateCategoryRequest> for CategoryPatch {
    fn from(r: UpdateCategoryRequest) -> Self {
        Self {
            name: r.name,
            icon: r.icon,
            color: r.color,
            kind: r.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_longer_than_100_chars_is_rejected() {
        let req = CreateCategoryRequest {
            name: "x".repeat(101),
            icon: "Car".into(),
            color: "#fff".into(),
            kind: EntryType::Expense,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn whitespace_only_name_is_rejected_after_trim() {
        let req = CreateCategoryRequest {
            name: "   ".into(),
            icon: "Car".into(),
            color: "#fff".into(),
            kind: EntryType::Expense,
        }
        .normalized();
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(UpdateCategoryRequest::default().validate().is_ok());
    }

    #[test]
    fn parses_type_field() {
        let req: CreateCategoryRequest = serde_json::from_str(
            r##"{"name":"Rent","icon":"Home","color":"#123456","type":"expense"}"##,
        )
        .unwrap();
        assert_eq!(req.kind, EntryType::Expense);
    }
}
