use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::repo_types::{Role, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn email_format(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        return Ok(());
    }
    let mut err = ValidationError::new("email");
    err.message = Some(Cow::Borrowed("Invalid email address"));
    Err(err)
}

/// Trimmed, lowercased email used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "email_format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Currency is required"))]
    pub currency: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

impl RegisterRequest {
    /// Normalizes email and trims free-text fields before validation.
    pub fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            currency: self.currency.trim().to_uppercase(),
            country: self.country.trim().to_uppercase(),
        }
    }
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "email_format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub currency: String,
    pub country: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            currency: u.currency,
            country: u.country,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_body(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            first_name: " Ana ".into(),
            last_name: "Lopez".into(),
            currency: "eur".into(),
            country: "es".into(),
        }
    }

    #[test]
    fn email_regex() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalization_lowercases_and_trims() {
        let req = register_body("  Ana@Example.COM ", "secret1").normalized();
        assert_eq!(req.email, "ana@example.com");
        assert_eq!(req.first_name, "Ana");
        assert_eq!(req.currency, "EUR");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_password_and_bad_email_fail_validation() {
        let errs = register_body("nope", "123").normalized().validate().unwrap_err();
        let fields = errs.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn public_user_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            email: "x@y.io".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "X".into(),
            last_name: "Y".into(),
            role: Role::User,
            is_active: true,
            currency: "USD".into(),
            country: "US".into(),
            created_at: time::OffsetDateTime::now_utc(),
            updated_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user.clone())).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("firstName"));
        // The raw record never serializes its hash either.
        assert!(!serde_json::to_string(&user).unwrap().contains("argon2"));
    }
}
