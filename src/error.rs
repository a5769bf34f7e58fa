//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while validating and resolving requested fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("allowed fields must be registered before allowed includes")]
    OrderingViolation,
    #[error(
        "requested field(s) `{}` are not allowed. Allowed field(s) are `{}`",
        unknown.join(", "),
        allowed.join(", ")
    )]
    InvalidFieldQuery {
        unknown: Vec<String>,
        allowed: Vec<String>,
    },
    #[error(
        "requested included field(s) `{}` cannot be checked: no allowed fields were registered",
        fields.join(", ")
    )]
    UnknownIncludedFieldsQuery { fields: Vec<String> },
    #[error("allowed field name must not be empty")]
    EmptyFieldName,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Field(FieldError::InvalidFieldQuery { .. }) => (StatusCode::BAD_REQUEST, "invalid_field_query"),
            AppError::Field(FieldError::UnknownIncludedFieldsQuery { .. }) => {
                (StatusCode::BAD_REQUEST, "unknown_included_fields")
            }
            AppError::Field(FieldError::OrderingViolation) => (StatusCode::INTERNAL_SERVER_ERROR, "ordering_violation"),
            AppError::Field(FieldError::EmptyFieldName) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Field(FieldError::InvalidFieldQuery { unknown, allowed }) => Some(serde_json::json!({
                "unknown": unknown,
                "allowed": allowed,
            })),
            AppError::Field(FieldError::UnknownIncludedFieldsQuery { fields }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status_and_code().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        (status, Json(body)).into_response()
    }
}
