//! Response types for the attendance API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the bodies of the calendar endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::{CalendarCell, WeekStart};
use crate::error::AttendanceError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// 400 with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// 404 for a missing record or event.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new("NOT_FOUND", message),
        }
    }

    /// 409 for an operation the current state does not allow.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            error: ApiError::new("INVALID_TRANSITION", message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<AttendanceError> for ApiErrorResponse {
    fn from(error: AttendanceError) -> Self {
        let message = error.to_string();
        match error {
            AttendanceError::MalformedTime { .. } | AttendanceError::MalformedDate { .. } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(message))
            }
            AttendanceError::InvalidMonth { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details("INVALID_MONTH", message, "month must be 1 through 12"),
            ),
            AttendanceError::DateOutOfRange { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("DATE_OUT_OF_RANGE", message))
            }
            AttendanceError::OvernightSpan { .. } => ApiErrorResponse::conflict(message),
            AttendanceError::ConfigNotFound { .. } | AttendanceError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
        }
    }
}

/// Body of `GET /calendar/month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthGridResponse {
    /// The month shown, as `YYYY-MM`.
    pub month: String,
    /// Week-start convention the grid was built with.
    pub week_start: WeekStart,
    /// Cells in row-major order, seven per row.
    pub cells: Vec<CalendarCell>,
}

/// Body of `GET /calendar/week`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekGridResponse {
    /// Week-start convention the week was built with.
    pub week_start: WeekStart,
    /// The seven dates of the week.
    pub days: Vec<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_malformed_date_maps_to_400() {
        let response: ApiErrorResponse = AttendanceError::MalformedDate {
            value: "2025-13-01".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
        assert!(response.error.message.contains("2025-13-01"));
    }

    #[test]
    fn test_overnight_span_maps_to_409() {
        let response: ApiErrorResponse = AttendanceError::OvernightSpan {
            clock_in: "22:00".to_string(),
            clock_out: "06:00".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "INVALID_TRANSITION");
    }

    #[test]
    fn test_not_found_helper() {
        let response = ApiErrorResponse::not_found("No event 'x'");
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "NOT_FOUND");
    }
}
