//! Core data models for the attendance engine.
//!
//! This module contains the records, events and derived values the store
//! owns or produces.

mod attendance;
mod clock;
mod schedule;
mod summary;
mod today;

pub use attendance::{
    AttendanceRecord, AttendanceRecordPatch, AttendanceStatus, WorkLocation, WorkTimeline,
};
pub use clock::{ClockTime, WorkingHours};
pub use schedule::{EventType, ScheduleEvent, ScheduleEventPatch};
pub use summary::{AttendanceSummary, ScheduleSummary};
pub use today::TodayAttendanceState;
