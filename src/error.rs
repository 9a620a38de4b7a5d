//! Service error types with HTTP status code mapping.
//!
//! [`MonitorError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "invalid current_charge: must be between 0 and 100",
///     "details": "current_charge"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`MonitorError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details, e.g. the offending field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A single field failed a range, length or choice check.
    #[error("invalid {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Battery with the given ID was not found.
    #[error("battery not found: {0}")]
    BatteryNotFound(i64),

    /// Alert with the given ID was not found.
    #[error("alert not found: {0}")]
    AlertNotFound(i64),

    /// Log entry with the given ID was not found.
    #[error("log entry not found: {0}")]
    LogNotFound(i64),

    /// Device with the given ID was not found.
    #[error("device not found: {0}")]
    DeviceNotFound(i64),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Shorthand for [`MonitorError::InvalidField`].
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidField { .. } => 1002,
            Self::BatteryNotFound(_) => 2001,
            Self::AlertNotFound(_) => 2002,
            Self::LogNotFound(_) => 2003,
            Self::DeviceNotFound(_) => 2004,
            Self::Conflict(_) => 2101,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidField { .. } => StatusCode::BAD_REQUEST,
            Self::BatteryNotFound(_)
            | Self::AlertNotFound(_)
            | Self::LogNotFound(_)
            | Self::DeviceNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::InvalidField { field, .. } => Some((*field).to_string()),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for MonitorError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(
                    db_err
                        .constraint()
                        .map_or_else(|| db_err.message().to_string(), |c| format!("{c} already exists")),
                );
            }
            if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
                return Self::InvalidRequest(db_err.message().to_string());
            }
        }
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        for err in [
            MonitorError::BatteryNotFound(1),
            MonitorError::AlertNotFound(1),
            MonitorError::LogNotFound(1),
            MonitorError::DeviceNotFound(1),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn invalid_field_carries_field_name() {
        let err = MonitorError::invalid_field("current_charge", "must be between 0 and 100");
        assert_eq!(err.error_code(), 1002);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.details().as_deref(), Some("current_charge"));
        assert_eq!(
            err.to_string(),
            "invalid current_charge: must be between 0 and 100"
        );
    }

    #[test]
    fn conflict_is_409() {
        let err = MonitorError::Conflict("serial_number already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2101);
    }

    #[test]
    fn non_database_sqlx_error_is_persistence_error() {
        let err = MonitorError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.error_code(), 3001);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
