//! Attendance record model and related types.
//!
//! An [`AttendanceRecord`] exists for at most one calendar date and carries the
//! clock readings, derived working hours and annotations for that day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::clock::{ClockTime, WorkingHours};

/// Attendance status of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    /// Worked the day.
    Present,
    /// Did not work and was not on leave.
    Absent,
    /// On approved leave.
    Leave,
    /// Worked, but started after the expected start.
    Late,
    /// The current day, not yet settled.
    Today,
    /// Saturday or Sunday marker.
    Weekend,
    /// A date with nothing recorded.
    NoRecord,
}

impl AttendanceStatus {
    /// Returns true for statuses that represent a day actually worked.
    ///
    /// Records in these states must keep their working hours consistent with
    /// their clock readings.
    pub fn is_worked(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Present | AttendanceStatus::Late | AttendanceStatus::Today
        )
    }
}

/// Where the day was worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkLocation {
    /// At the office.
    Office,
    /// Working from home or elsewhere.
    Remote,
    /// At a client's premises.
    ClientSite,
}

/// Expected versus actual working window for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTimeline {
    /// Scheduled start of the working day.
    pub expected_start: ClockTime,
    /// Scheduled end of the working day.
    pub expected_end: ClockTime,
    /// Actual clock-in, once known.
    #[serde(default)]
    pub actual_start: Option<ClockTime>,
    /// Actual clock-out, once known.
    #[serde(default)]
    pub actual_end: Option<ClockTime>,
}

/// Attendance for one calendar date.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let record = AttendanceRecord::new(
///     NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     AttendanceStatus::Absent,
/// );
/// assert!(record.clock_in.is_none());
/// assert!(!record.status.is_worked());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The date this record belongs to; unique within the store.
    pub date: NaiveDate,
    /// Status of the day.
    pub status: AttendanceStatus,
    /// Clock-in time, if punched.
    #[serde(default)]
    pub clock_in: Option<ClockTime>,
    /// Clock-out time, if punched.
    #[serde(default)]
    pub clock_out: Option<ClockTime>,
    /// Elapsed time between clock-in and clock-out.
    #[serde(default)]
    pub working_hours: Option<WorkingHours>,
    /// Where the day was worked.
    #[serde(default)]
    pub location: Option<WorkLocation>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Hours worked beyond the standard day.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Whether only half a day was worked or taken.
    #[serde(default)]
    pub half_day: bool,
    /// Whether a clock punch is missing for the day.
    #[serde(default)]
    pub missing_punch: bool,
    /// Expected and actual working window.
    #[serde(default)]
    pub timeline: Option<WorkTimeline>,
}

impl AttendanceRecord {
    /// Creates an empty record with the given status.
    pub fn new(date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            date,
            status,
            clock_in: None,
            clock_out: None,
            working_hours: None,
            location: None,
            notes: None,
            overtime_hours: None,
            half_day: false,
            missing_punch: false,
            timeline: None,
        }
    }

    /// Returns true when the record has a clock-in but no clock-out.
    pub fn is_clocked_in(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }
}

/// Partial update merged into an existing [`AttendanceRecord`].
///
/// Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecordPatch {
    /// New clock-in time.
    #[serde(default)]
    pub clock_in: Option<ClockTime>,
    /// New clock-out time.
    #[serde(default)]
    pub clock_out: Option<ClockTime>,
    /// New location.
    #[serde(default)]
    pub location: Option<WorkLocation>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// New half-day flag.
    #[serde(default)]
    pub half_day: Option<bool>,
    /// New missing-punch flag.
    #[serde(default)]
    pub missing_punch: Option<bool>,
    /// New work timeline.
    #[serde(default)]
    pub timeline: Option<WorkTimeline>,
}

impl AttendanceRecordPatch {
    /// Writes every set field of the patch into `record`.
    pub fn apply_to(self, record: &mut AttendanceRecord) {
        if let Some(clock_in) = self.clock_in {
            record.clock_in = Some(clock_in);
        }
        if let Some(clock_out) = self.clock_out {
            record.clock_out = Some(clock_out);
        }
        if let Some(location) = self.location {
            record.location = Some(location);
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
        if let Some(overtime_hours) = self.overtime_hours {
            record.overtime_hours = Some(overtime_hours);
        }
        if let Some(half_day) = self.half_day {
            record.half_day = half_day;
        }
        if let Some(missing_punch) = self.missing_punch {
            record.missing_punch = missing_punch;
        }
        if let Some(timeline) = self.timeline {
            record.timeline = Some(timeline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_worked_statuses() {
        assert!(AttendanceStatus::Present.is_worked());
        assert!(AttendanceStatus::Late.is_worked());
        assert!(AttendanceStatus::Today.is_worked());
        assert!(!AttendanceStatus::Absent.is_worked());
        assert!(!AttendanceStatus::Leave.is_worked());
        assert!(!AttendanceStatus::Weekend.is_worked());
        assert!(!AttendanceStatus::NoRecord.is_worked());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::NoRecord).unwrap(),
            "\"no-record\""
        );
        assert_eq!(
            serde_json::to_string(&WorkLocation::ClientSite).unwrap(),
            "\"client-site\""
        );
    }

    #[test]
    fn test_is_clocked_in() {
        let mut record = AttendanceRecord::new(make_date("2025-03-03"), AttendanceStatus::Present);
        assert!(!record.is_clocked_in());

        record.clock_in = Some(time("09:00"));
        assert!(record.is_clocked_in());

        record.clock_out = Some(time("17:00"));
        assert!(!record.is_clocked_in());
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut record = AttendanceRecord::new(make_date("2025-03-03"), AttendanceStatus::Present);
        record.notes = Some("kept".to_string());
        record.clock_in = Some(time("09:00"));

        AttendanceRecordPatch {
            clock_out: Some(time("17:30")),
            half_day: Some(true),
            ..Default::default()
        }
        .apply_to(&mut record);

        assert_eq!(record.clock_in, Some(time("09:00")));
        assert_eq!(record.clock_out, Some(time("17:30")));
        assert_eq!(record.notes.as_deref(), Some("kept"));
        assert!(record.half_day);
        assert!(!record.missing_punch);
    }

    #[test]
    fn test_record_deserialization_with_defaults() {
        let json = r#"{
            "date": "2025-03-04",
            "status": "late",
            "clock_in": "09:20",
            "clock_out": "18:00",
            "working_hours": "8h 40m",
            "location": "remote"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
        assert_eq!(record.working_hours, Some(WorkingHours::from_minutes(520)));
        assert_eq!(record.location, Some(WorkLocation::Remote));
        assert!(record.timeline.is_none());
        assert!(!record.half_day);
    }
}
