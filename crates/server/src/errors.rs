//! Domain-error to HTTP mapping and the structured error body.
//!
//! Every non-2xx response carries the same shape; `fieldErrors` appears only
//! for request-shape validation failures. Internal failures (hashing, token
//! signing, storage driver errors) are logged and collapsed to an opaque 500
//! message so no driver detail leaks to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use service::auth::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
    field_errors: Option<Vec<FieldError>>,
}

impl ApiError {
    /// 400 with per-field messages from the boundary validation pass.
    pub fn validation(path: &str, violations: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            path: path.to_string(),
            field_errors: Some(violations),
        }
    }

    /// Map a workflow error to its fixed status. A write-time conflict from
    /// the store gets the same treatment as one caught by the pre-check.
    pub fn from_domain(err: AuthError, path: &str) -> Self {
        let status = match &err {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict { .. } => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Hash(_) | AuthError::Token(_) | AuthError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(code = err.code(), error = %err, "internal error handling request");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self { status, message, path: path.to_string(), field_errors: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message,
            path: self.path,
            field_errors: self.field_errors,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409_with_field_in_message() {
        let err = AuthError::Conflict { field: "email", value: "a@b.com".into() };
        let api = ApiError::from_domain(err, "/api/v1/auth/register");
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.message, "account already exists with email: 'a@b.com'");
    }

    #[test]
    fn invalid_credentials_maps_to_401_without_detail() {
        let api = ApiError::from_domain(AuthError::InvalidCredentials, "/api/v1/auth/login");
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.message, "Invalid credentials");
    }

    #[test]
    fn repository_errors_never_leak() {
        let err = AuthError::Repository("connection refused to pg://secret-host".into());
        let api = ApiError::from_domain(err, "/api/v1/auth/register");
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn field_errors_serialized_only_when_present() {
        let api = ApiError::from_domain(AuthError::NotFound, "/api/v1/users/x");
        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: api.status.as_u16(),
            error: "Not Found".into(),
            message: api.message,
            path: api.path,
            field_errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("fieldErrors").is_none());
    }
}
