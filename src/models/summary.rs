//! Monthly rollups computed from the store.
//!
//! Neither summary is cached; both are recomputed from the store's records
//! and events on every request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::EventType;

/// Attendance counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days with status `present`.
    pub present: u32,
    /// Days with status `late`.
    pub late: u32,
    /// Days with status `absent`.
    pub absent: u32,
    /// Days with status `leave`.
    pub leave: u32,
    /// Sum of recorded overtime hours.
    pub total_overtime_hours: Decimal,
    /// Records whose status is not `weekend`.
    pub working_days: u32,
    /// Percentage of working days attended (present or late), one decimal place.
    pub attendance_rate: Decimal,
}

/// Schedule event counts for one month.
///
/// An event spanning several days is counted once for each day it occurs on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Shift occurrences.
    pub shifts: u32,
    /// Meeting occurrences.
    pub meetings: u32,
    /// Training occurrences.
    pub trainings: u32,
    /// Holiday occurrences.
    pub holidays: u32,
    /// Deadline occurrences.
    pub deadlines: u32,
}

impl ScheduleSummary {
    /// Adds one occurrence of `event_type`.
    pub fn record(&mut self, event_type: EventType) {
        match event_type {
            EventType::Shift => self.shifts += 1,
            EventType::Meeting => self.meetings += 1,
            EventType::Training => self.trainings += 1,
            EventType::Holiday => self.holidays += 1,
            EventType::Deadline => self.deadlines += 1,
        }
    }

    /// Total occurrences across all types.
    pub fn total(&self) -> u32 {
        self.shifts + self.meetings + self.trainings + self.holidays + self.deadlines
    }
}
