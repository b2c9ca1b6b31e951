//! Error types for the attendance engine.
//!
//! Expected absences (a missing record, an unknown event id, a clock-out
//! without a clock-in) are reported through `bool` and `Option` returns on the
//! store. This module covers the remaining failures: malformed input at parse
//! boundaries and configuration problems.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::AttendanceError;
///
/// let error = AttendanceError::MalformedTime {
///     value: "25:99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Malformed clock time '25:99': expected HH:MM");
/// ```
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// A clock time string was not a valid `HH:MM` value.
    #[error("Malformed clock time '{value}': expected HH:MM")]
    MalformedTime {
        /// The rejected input.
        value: String,
    },

    /// A date string was not a valid `YYYY-MM-DD` key.
    #[error("Malformed date '{value}': expected YYYY-MM-DD")]
    MalformedDate {
        /// The rejected input.
        value: String,
    },

    /// A year/month pair does not name a calendar month.
    #[error("Invalid month {month} for year {year}")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month, as supplied by the caller.
        month: u32,
    },

    /// Clock-out precedes clock-in and overnight spans are rejected.
    #[error("Clock-out {clock_out} precedes clock-in {clock_in}; overnight spans are not allowed")]
    OvernightSpan {
        /// The clock-in time.
        clock_in: String,
        /// The clock-out time.
        clock_out: String,
    },

    /// A date fell outside the range chrono can represent.
    #[error("Date out of range near {date}")]
    DateOutOfRange {
        /// The anchor date that overflowed.
        date: NaiveDate,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return AttendanceError.
pub type AttendanceResult<T> = Result<T, AttendanceError>;
