//! Calculation logic for the attendance engine.
//!
//! This module contains the pure functions layered over the store's data:
//! clock arithmetic and date keys, week and month calendar grids, schedule
//! event queries by date, and monthly attendance and schedule rollups.

mod calendar_grid;
mod schedule_query;
mod statistics;
mod time_arithmetic;

pub use calendar_grid::{CalendarCell, CalendarGridBuilder, MIN_MONTH_ROWS, WeekStart, YearMonth};
pub use schedule_query::{ALL, EventFilter, events_for};
pub use statistics::{monthly_attendance_summary, monthly_schedule_summary};
pub use time_arithmetic::{
    OvernightPolicy, date_key, elapsed, elapsed_str, is_weekend, parse_date_key,
};
