use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

/// One failed field in a request body or query string.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every failure a handler can return. Messages for auth failures are
/// intentionally generic.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn invalid(field: &str, message: &str) -> Self {
        ApiError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                message: "Invalid input".into(),
                errors: Some(errors),
            },
            ApiError::Conflict(msg) | ApiError::NotFound(msg) => ErrorBody {
                message: msg,
                errors: None,
            },
            ApiError::InvalidCredentials => ErrorBody {
                message: "Invalid credentials".into(),
                errors: None,
            },
            ApiError::Unauthorized => ErrorBody {
                message: "Unauthorized".into(),
                errors: None,
            },
            ApiError::Forbidden => ErrorBody {
                message: "Admin access required".into(),
                errors: None,
            },
            ApiError::Internal(detail) => {
                // Detail stays in the logs.
                error!(error = %detail, "internal error");
                ErrorBody {
                    message: "Internal server error".into(),
                    errors: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
            if db_err.is_unique_violation()
                && db_err.constraint().is_some_and(|c| c.contains("email"))
            {
                return ApiError::Conflict("User already exists".into());
            }
        }
        ApiError::Internal(format!("{err:#}"))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errs
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid {field}")),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(fields)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        warn!(error = %rej.body_text(), "json body rejected");
        ApiError::invalid("body", &rej.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rej: QueryRejection) -> Self {
        warn!(error = %rej.body_text(), "query string rejected");
        ApiError::invalid("query", &rej.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        // Malformed ids are indistinguishable from missing ones.
        ApiError::NotFound("Resource not found".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::invalid("x", "bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let res = ApiError::Internal("password column missing".into()).into_response();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Internal server error"));
        assert!(!text.contains("password column"));
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let err = ApiError::Validation(vec![
            FieldError::new("email", "Invalid email address"),
            FieldError::new("password", "Password must be at least 6 characters"),
        ]);
        let res = err.into_response();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Invalid input");
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn plain_anyhow_maps_to_internal() {
        let err: ApiError = anyhow::anyhow!("pool timed out").into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
