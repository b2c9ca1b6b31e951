//! Configuration types for the attendance store.
//!
//! These are deserialized from `store.yaml`; every field has a default so a
//! partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{CalendarGridBuilder, OvernightPolicy, WeekStart};
use crate::models::{ClockTime, WorkLocation};

const DEFAULT_EXPECTED_START: ClockTime = match ClockTime::new(9, 0) {
    Some(time) => time,
    None => unreachable!(),
};

const DEFAULT_EXPECTED_END: ClockTime = match ClockTime::new(17, 0) {
    Some(time) => time,
    None => unreachable!(),
};

/// Store-wide settings.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::WeekStart;
/// use attendance_engine::config::StoreConfig;
///
/// let config: StoreConfig = serde_yaml::from_str("week_start: monday").unwrap();
/// assert_eq!(config.week_start, WeekStart::Monday);
/// assert_eq!(config.expected_start.to_string(), "09:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Week-start convention shared by every calendar view.
    pub week_start: WeekStart,
    /// Whether clock-outs earlier than the clock-in roll over midnight.
    pub overnight: OvernightPolicy,
    /// Expected start of the working day, copied into new work timelines.
    pub expected_start: ClockTime,
    /// Expected end of the working day, copied into new work timelines.
    pub expected_end: ClockTime,
    /// Hours in a standard day; time worked beyond this is overtime.
    pub standard_day_hours: Decimal,
    /// Location used on clock-in and when a record names none.
    pub default_location: WorkLocation,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            overnight: OvernightPolicy::default(),
            expected_start: DEFAULT_EXPECTED_START,
            expected_end: DEFAULT_EXPECTED_END,
            standard_day_hours: Decimal::new(8, 0),
            default_location: WorkLocation::Office,
        }
    }
}

impl StoreConfig {
    /// A grid builder using the configured week start.
    pub fn calendar(&self) -> CalendarGridBuilder {
        CalendarGridBuilder::new(self.week_start)
    }
}
