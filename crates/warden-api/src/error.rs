// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and the HTTP error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use warden_core::{ConfigurationError, EncodeError, StoreError};

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients.
///
/// Token parse failures never appear here: the request gate absorbs them
/// and degrades the request to anonymous, so the only auth-shaped errors
/// a client sees are the policy layer's 401 and 403.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Input validation failed.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Authentication required.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Conflicting resource state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backing service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a bad request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Creates a forbidden error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Creates a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Localized message for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(_) => "잘못된 요청입니다".to_string(),
            Self::Validation(errors) => format!("입력 검증 실패: {errors}"),
            Self::Unauthorized(_) => "인증이 필요합니다".to_string(),
            Self::Forbidden(_) => "접근 권한이 없습니다".to_string(),
            Self::NotFound(_) => "요청한 리소스를 찾을 수 없습니다".to_string(),
            Self::Conflict(_) => "이미 존재하는 리소스입니다".to_string(),
            Self::ServiceUnavailable(_) => "서비스를 일시적으로 사용할 수 없습니다".to_string(),
            Self::Internal(_) => "서버 내부 오류가 발생했습니다".to_string(),
        }
    }

    /// Builds the JSON error response, stamping the given request id.
    pub fn to_response(&self, request_id: Option<Uuid>) -> Response {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.error_code(),
                message: self.to_string(),
                user_message: self.user_message(),
            },
            request_id,
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.to_response(None)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::DuplicateUsername(name) => {
                Self::Conflict(format!("username already taken: {name}"))
            }
            StoreError::DuplicateEmail(email) => {
                Self::Conflict(format!("email already registered: {email}"))
            }
            StoreError::Unavailable(msg) => Self::ServiceUnavailable(msg),
        }
    }
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(err: ConfigurationError) -> Self {
        Self::Internal(err.to_string())
    }
}

// =============================================================================
// Validation errors
// =============================================================================

/// Accumulated field-level validation failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    /// The failing fields.
    pub errors: Vec<FieldError>,
}

/// A single field validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// The field name.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationErrors {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failing field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether anything failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into a result: `Ok` when empty, `Err(ApiError)` otherwise.
    pub fn into_result(self) -> ApiResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<Uuid>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    user_message: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes_and_user_messages() {
        assert_eq!(ApiError::unauthorized("x").error_code(), "UNAUTHORIZED");
        assert_eq!(ApiError::unauthorized("x").user_message(), "인증이 필요합니다");
        assert_eq!(ApiError::forbidden("x").user_message(), "접근 권한이 없습니다");
    }

    #[test]
    fn test_error_from_store_error() {
        let err = ApiError::from(StoreError::DuplicateUsername("alice".to_string()));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_validation_accumulator() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("username", "must not be empty");
        errors.add("password", "too short");
        assert_eq!(
            errors.to_string(),
            "username: must not be empty, password: too short"
        );

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
