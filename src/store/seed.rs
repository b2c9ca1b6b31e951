//! Seed data the store is constructed from.
//!
//! A seed either comes from `seed.yaml` (see [`crate::config::ConfigLoader`])
//! or is generated by [`SeedData::demo`] relative to the current date.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::attendance_store::{overtime_beyond, settle_working_hours};
use crate::calculation::{YearMonth, date_key, is_weekend};
use crate::config::StoreConfig;
use crate::models::{
    AttendanceRecord, AttendanceStatus, ClockTime, EventType, ScheduleEvent, WorkLocation,
    WorkTimeline,
};

/// Initial records and events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// Attendance records; a later record for the same date replaces an earlier one.
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
    /// Schedule events in insertion order.
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
}

impl SeedData {
    /// Builds demo data for the month containing `today`.
    ///
    /// Every day of the month before `today` gets a record following a fixed
    /// pattern of present, late, leave and absent days, weekends are marked,
    /// and `today` gets an unsettled `today` record. A handful of schedule
    /// events are spread over the month.
    pub fn demo(today: NaiveDate, config: &StoreConfig) -> Self {
        let month = YearMonth::of(today);

        let mut records: Vec<AttendanceRecord> = month
            .days()
            .take_while(|date| *date < today)
            .map(|date| demo_record(date, config))
            .collect();

        let today_status = if is_weekend(today) {
            AttendanceStatus::Weekend
        } else {
            AttendanceStatus::Today
        };
        records.push(AttendanceRecord::new(today, today_status));

        Self {
            records,
            events: demo_events(month),
        }
    }
}

fn clock(hour: u32, minute: u32) -> Option<ClockTime> {
    ClockTime::new(hour, minute)
}

fn demo_record(date: NaiveDate, config: &StoreConfig) -> AttendanceRecord {
    if is_weekend(date) {
        return AttendanceRecord::new(date, AttendanceStatus::Weekend);
    }

    let day = date.day();
    let mut record = match day % 10 {
        3 => worked(date, AttendanceStatus::Late, clock(9, 25), clock(17, 25), config),
        7 => {
            let mut record = AttendanceRecord::new(date, AttendanceStatus::Leave);
            record.notes = Some("Annual leave".to_string());
            record
        }
        9 if day > 20 => {
            let mut record = AttendanceRecord::new(date, AttendanceStatus::Absent);
            record.missing_punch = true;
            record
        }
        _ if day % 6 == 0 => worked(date, AttendanceStatus::Present, clock(9, 0), clock(19, 30), config),
        _ => worked(date, AttendanceStatus::Present, clock(9, 0), clock(17, 0), config),
    };

    if date.weekday() == Weekday::Fri && record.status.is_worked() {
        record.location = Some(WorkLocation::Remote);
    }

    record
}

fn worked(
    date: NaiveDate,
    status: AttendanceStatus,
    clock_in: Option<ClockTime>,
    clock_out: Option<ClockTime>,
    config: &StoreConfig,
) -> AttendanceRecord {
    let mut record = AttendanceRecord::new(date, status);
    record.clock_in = clock_in;
    record.clock_out = clock_out;
    record.location = Some(config.default_location);
    record.timeline = Some(WorkTimeline {
        expected_start: config.expected_start,
        expected_end: config.expected_end,
        actual_start: clock_in,
        actual_end: clock_out,
    });

    // demo times are same-day spans, so settling cannot fail
    if settle_working_hours(&mut record, config.overnight).is_ok() {
        record.overtime_hours = record
            .working_hours
            .and_then(|hours| overtime_beyond(hours, config.standard_day_hours));
    }

    record
}

fn demo_events(month: YearMonth) -> Vec<ScheduleEvent> {
    let mut events = Vec::new();

    for date in month.days() {
        let key = date_key(date);
        match date.weekday() {
            Weekday::Mon => events.extend(demo_event(
                format!("evt-standup-{}", key),
                "Weekly standup",
                EventType::Meeting,
                date,
                (10, 0),
                (10, 30),
                Some("Engineering"),
                Some("Platform"),
            )),
            Weekday::Wed => events.extend(demo_event(
                format!("evt-support-{}", key),
                "Support rota",
                EventType::Shift,
                date,
                (8, 0),
                (16, 0),
                Some("Operations"),
                Some("Support"),
            )),
            _ => {}
        }

        match date.day() {
            15 => events.extend(demo_event(
                format!("evt-training-{}", key),
                "Compliance training",
                EventType::Training,
                date,
                (13, 0),
                (16, 0),
                Some("HR"),
                None,
            )),
            25 => events.extend(demo_event(
                format!("evt-payroll-{}", key),
                "Payroll cutoff",
                EventType::Deadline,
                date,
                (17, 0),
                (17, 0),
                Some("Finance"),
                None,
            )),
            _ => {}
        }
    }

    events
}

#[allow(clippy::too_many_arguments)]
fn demo_event(
    id: String,
    title: &str,
    event_type: EventType,
    date: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    department: Option<&str>,
    team: Option<&str>,
) -> Option<ScheduleEvent> {
    Some(ScheduleEvent {
        id,
        title: title.to_string(),
        event_type,
        start: date.and_hms_opt(start.0, start.1, 0)?,
        end: date.and_hms_opt(end.0, end.1, 0)?,
        department: department.map(str::to_string),
        team: team.map(str::to_string),
        description: None,
    })
}
