//! Clock arithmetic, weekend detection and date keys.
//!
//! These are the pure helpers every other part of the engine builds on.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{ClockTime, WorkingHours};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// How [`elapsed`] treats a clock-out that is earlier than the clock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvernightPolicy {
    /// Refuse the span with [`AttendanceError::OvernightSpan`].
    #[default]
    Reject,
    /// Treat the clock-out as falling on the next day.
    RollOver,
}

/// Computes the working time between a clock-in and a clock-out.
///
/// Both readings are taken to be on the same day. When the clock-out is
/// earlier than the clock-in the span crosses midnight, which is either
/// rejected or rolled over to the next day depending on `policy`.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{elapsed, OvernightPolicy};
/// use attendance_engine::models::ClockTime;
///
/// let clock_in: ClockTime = "09:15".parse().unwrap();
/// let clock_out: ClockTime = "17:45".parse().unwrap();
/// let worked = elapsed(clock_in, clock_out, OvernightPolicy::Reject).unwrap();
/// assert_eq!(worked.to_string(), "8h 30m");
///
/// // 22:00 -> 06:00 only works when overnight spans are allowed
/// let night_in: ClockTime = "22:00".parse().unwrap();
/// let night_out: ClockTime = "06:00".parse().unwrap();
/// assert!(elapsed(night_in, night_out, OvernightPolicy::Reject).is_err());
/// assert_eq!(
///     elapsed(night_in, night_out, OvernightPolicy::RollOver).unwrap().to_string(),
///     "8h 0m"
/// );
/// ```
pub fn elapsed(
    clock_in: ClockTime,
    clock_out: ClockTime,
    policy: OvernightPolicy,
) -> AttendanceResult<WorkingHours> {
    let diff = clock_out.minutes_since_midnight() - clock_in.minutes_since_midnight();

    if diff >= 0 {
        return Ok(WorkingHours::from_minutes(diff));
    }

    match policy {
        OvernightPolicy::Reject => Err(AttendanceError::OvernightSpan {
            clock_in: clock_in.to_string(),
            clock_out: clock_out.to_string(),
        }),
        OvernightPolicy::RollOver => Ok(WorkingHours::from_minutes(diff + MINUTES_PER_DAY)),
    }
}

/// Parses two `HH:MM` strings and computes the working time between them.
///
/// A malformed string is a caller bug and is reported as
/// [`AttendanceError::MalformedTime`] instead of producing a duration.
pub fn elapsed_str(
    clock_in: &str,
    clock_out: &str,
    policy: OvernightPolicy,
) -> AttendanceResult<WorkingHours> {
    elapsed(clock_in.parse()?, clock_out.parse()?, policy)
}

/// Returns true for Saturday and Sunday, the last and first days of a
/// Sunday-start week.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Formats the canonical `YYYY-MM-DD` lookup key for a date.
///
/// The key is built from the calendar components only, so it never shifts
/// by a day the way an instant converted through UTC can.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::date_key;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
/// assert_eq!(date_key(date), "2025-03-07");
/// ```
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses a `YYYY-MM-DD` key back into a date.
pub fn parse_date_key(key: &str) -> AttendanceResult<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").map_err(|_| {
        AttendanceError::MalformedDate {
            value: key.to_string(),
        }
    })
}
