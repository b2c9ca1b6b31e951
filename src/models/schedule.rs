//! Schedule event model.
//!
//! Schedule events are calendar items that are not attendance punches:
//! shifts, meetings, trainings, deadlines and holidays.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The kind of a schedule event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A rostered work shift.
    Shift,
    /// A meeting.
    Meeting,
    /// A public or company holiday.
    Holiday,
    /// A training session.
    Training,
    /// A deadline.
    Deadline,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Shift => write!(f, "shift"),
            EventType::Meeting => write!(f, "meeting"),
            EventType::Holiday => write!(f, "holiday"),
            EventType::Training => write!(f, "training"),
            EventType::Deadline => write!(f, "deadline"),
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shift" => Ok(EventType::Shift),
            "meeting" => Ok(EventType::Meeting),
            "holiday" => Ok(EventType::Holiday),
            "training" => Ok(EventType::Training),
            "deadline" => Ok(EventType::Deadline),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}

/// A scheduled activity.
///
/// An event occurs on every calendar date from the date of `start` through the
/// date of `end`, so overnight shifts and multi-day trainings show up on each
/// day they touch.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{EventType, ScheduleEvent};
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let event = ScheduleEvent {
///     id: "evt-1".to_string(),
///     title: "Night shift".to_string(),
///     event_type: EventType::Shift,
///     start: NaiveDateTime::parse_from_str("2025-03-10 22:00", "%Y-%m-%d %H:%M").unwrap(),
///     end: NaiveDateTime::parse_from_str("2025-03-11 06:00", "%Y-%m-%d %H:%M").unwrap(),
///     department: Some("Operations".to_string()),
///     team: None,
///     description: None,
/// };
/// assert!(event.occurs_on(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()));
/// assert!(!event.occurs_on(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Unique identifier within the store.
    pub id: String,
    /// Short title.
    pub title: String,
    /// The kind of event.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Start of the event.
    pub start: NaiveDateTime,
    /// End of the event.
    pub end: NaiveDateTime,
    /// Owning department, if any.
    #[serde(default)]
    pub department: Option<String>,
    /// Owning team, if any.
    #[serde(default)]
    pub team: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ScheduleEvent {
    /// Returns true if the event touches the given calendar date.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let first = self.start.date();
        let last = self.end.date().max(first);
        first <= date && date <= last
    }
}

/// Partial update merged into an existing [`ScheduleEvent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEventPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New event type.
    #[serde(default, rename = "type")]
    pub event_type: Option<EventType>,
    /// New start.
    #[serde(default)]
    pub start: Option<NaiveDateTime>,
    /// New end.
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    /// New department.
    #[serde(default)]
    pub department: Option<String>,
    /// New team.
    #[serde(default)]
    pub team: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

impl ScheduleEventPatch {
    /// Writes every set field of the patch into `event`. The id never changes.
    pub fn apply_to(self, event: &mut ScheduleEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(department) = self.department {
            event.department = Some(department);
        }
        if let Some(team) = self.team {
            event.team = Some(team);
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
    }
}
