//! Today's clock state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attendance::{AttendanceRecord, AttendanceStatus, WorkLocation};
use super::clock::{ClockTime, WorkingHours};
use crate::calculation::is_weekend;

/// Clock state for the current day, kept in lock-step with today's record.
///
/// `is_clocked` is true exactly when `clock_in` is set and `clock_out` is not.
/// The store only builds this through [`TodayAttendanceState::derive`], which
/// keeps that rule; values built by hand or deserialized are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayAttendanceState {
    /// The date this state describes.
    pub date: NaiveDate,
    /// Clock-in time, if punched.
    pub clock_in: Option<ClockTime>,
    /// Clock-out time, if punched.
    pub clock_out: Option<ClockTime>,
    /// Whether the user is currently clocked in.
    pub is_clocked: bool,
    /// Status of the day.
    pub status: AttendanceStatus,
    /// Elapsed working time once clocked out.
    pub working_hours: Option<WorkingHours>,
    /// Where the day is being worked.
    pub location: WorkLocation,
}

impl TodayAttendanceState {
    /// Derives today's state from the record stored for `date`, if any.
    pub fn derive(
        date: NaiveDate,
        record: Option<&AttendanceRecord>,
        default_location: WorkLocation,
    ) -> Self {
        match record {
            Some(record) => Self {
                date,
                clock_in: record.clock_in,
                clock_out: record.clock_out,
                is_clocked: record.is_clocked_in(),
                status: record.status,
                working_hours: record.working_hours,
                location: record.location.unwrap_or(default_location),
            },
            None => Self {
                date,
                clock_in: None,
                clock_out: None,
                is_clocked: false,
                status: if is_weekend(date) {
                    AttendanceStatus::Weekend
                } else {
                    AttendanceStatus::NoRecord
                },
                working_hours: None,
                location: default_location,
            },
        }
    }
}
