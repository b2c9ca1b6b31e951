//! Clock time and worked-duration values.
//!
//! [`ClockTime`] is a wall-clock `HH:MM` reading and [`WorkingHours`] is the
//! whole-minute duration rendered as `"{H}h {M}m"` on attendance records. Both
//! serialize as their display strings.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AttendanceError, AttendanceResult};

/// A minute-precision wall-clock time such as `09:30`.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ClockTime;
///
/// let time: ClockTime = "09:30".parse().unwrap();
/// assert_eq!(time.minutes_since_midnight(), 570);
/// assert_eq!(time.to_string(), "09:30");
/// assert!("9am".parse::<ClockTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Creates a clock time from an hour (0-23) and minute (0-59).
    pub const fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: (hour * 60 + minute) as u16,
            })
        } else {
            None
        }
    }

    /// Truncates a chrono time to minute precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    /// The hour component.
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// The minute component.
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Minutes elapsed since 00:00.
    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = AttendanceError;

    fn from_str(s: &str) -> AttendanceResult<Self> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self::from_naive)
            .map_err(|_| AttendanceError::MalformedTime {
                value: s.to_string(),
            })
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A worked duration in whole minutes.
///
/// # Example
///
/// ```
/// use attendance_engine::models::WorkingHours;
///
/// let hours = WorkingHours::from_minutes(510);
/// assert_eq!(hours.to_string(), "8h 30m");
/// assert_eq!("8h 30m".parse::<WorkingHours>().unwrap(), hours);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WorkingHours {
    minutes: i64,
}

impl WorkingHours {
    /// Creates a duration from a minute count.
    pub fn from_minutes(minutes: i64) -> Self {
        Self { minutes }
    }

    /// Total minutes.
    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    /// The duration in hours as a [`Decimal`] (e.g. 510 minutes is 8.5).
    pub fn as_decimal_hours(&self) -> Decimal {
        Decimal::new(self.minutes, 0) / Decimal::new(60, 0)
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for WorkingHours {
    type Err = AttendanceError;

    fn from_str(s: &str) -> AttendanceResult<Self> {
        let malformed = || AttendanceError::MalformedTime {
            value: s.to_string(),
        };

        let (hours, minutes) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let hours: i64 = hours
            .strip_suffix('h')
            .and_then(|h| h.parse().ok())
            .ok_or_else(malformed)?;
        let minutes: i64 = minutes
            .strip_suffix('m')
            .and_then(|m| m.parse().ok())
            .filter(|m| (0..60).contains(m))
            .ok_or_else(malformed)?;

        Ok(Self::from_minutes(hours * 60 + minutes))
    }
}

impl Serialize for WorkingHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WorkingHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
