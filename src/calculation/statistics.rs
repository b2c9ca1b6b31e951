//! Monthly attendance and schedule rollups.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calendar_grid::YearMonth;
use super::schedule_query::{EventFilter, events_for};
use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, ScheduleEvent, ScheduleSummary,
};

/// Buckets the records of `month` by status.
///
/// Overtime hours are summed across all records of the month, and every
/// record whose status is not `weekend` counts as a working day.
/// `attendance_rate` is the share of working days that were present or late,
/// as a percentage rounded to one decimal place.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use attendance_engine::calculation::{monthly_attendance_summary, YearMonth};
/// use attendance_engine::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let mut records = BTreeMap::new();
/// for (day, status) in [(3, AttendanceStatus::Present), (4, AttendanceStatus::Absent)] {
///     let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
///     records.insert(date, AttendanceRecord::new(date, status));
/// }
///
/// let summary = monthly_attendance_summary(&records, YearMonth::new(2025, 3).unwrap());
/// assert_eq!(summary.present, 1);
/// assert_eq!(summary.absent, 1);
/// assert_eq!(summary.working_days, 2);
/// assert_eq!(summary.attendance_rate.to_string(), "50.0");
/// ```
pub fn monthly_attendance_summary(
    records: &BTreeMap<NaiveDate, AttendanceRecord>,
    month: YearMonth,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();

    for record in records
        .range(month.first_day()..)
        .map(|(_, record)| record)
        .take_while(|record| month.contains(record.date))
    {
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Leave => summary.leave += 1,
            AttendanceStatus::Today | AttendanceStatus::Weekend | AttendanceStatus::NoRecord => {}
        }

        if let Some(overtime) = record.overtime_hours {
            summary.total_overtime_hours += overtime;
        }

        if record.status != AttendanceStatus::Weekend {
            summary.working_days += 1;
        }
    }

    summary.attendance_rate = attendance_rate(summary.present + summary.late, summary.working_days);
    summary
}

fn attendance_rate(attended: u32, working_days: u32) -> Decimal {
    if working_days == 0 {
        return Decimal::new(0, 1);
    }
    let rate = Decimal::from(attended) * Decimal::ONE_HUNDRED / Decimal::from(working_days);
    // rescale keeps a trailing zero, so 80 renders as "80.0"
    let mut rate = rate.round_dp(1);
    rate.rescale(1);
    rate
}

/// Tallies schedule events by type across every day of `month`.
///
/// Each day of the month is queried through [`events_for`] with `filter`, so
/// the cost is proportional to days times events and is paid on every call.
pub fn monthly_schedule_summary(
    events: &[ScheduleEvent],
    month: YearMonth,
    filter: &EventFilter,
) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();

    for date in month.days() {
        for event in events_for(events, date, filter) {
            summary.record(event.event_type);
        }
    }

    summary
}
