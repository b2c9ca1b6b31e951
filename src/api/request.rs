//! Request types for the attendance API.
//!
//! This module defines the JSON bodies and query strings the handlers accept.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{ALL, EventFilter};
use crate::models::{
    AttendanceRecordPatch, AttendanceStatus, ClockTime, EventType, ScheduleEvent,
};

/// Body for `POST /attendance/clock-in` and `POST /attendance/clock-out`.
///
/// An empty body, or one without `time`, uses the store's current time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockRequest {
    /// Explicit clock reading in `HH:MM`.
    #[serde(default)]
    pub time: Option<ClockTime>,
}

/// Body for `PUT /attendance/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// The new status.
    pub status: AttendanceStatus,
    /// Additional fields merged into the record.
    #[serde(default)]
    pub patch: Option<AttendanceRecordPatch>,
}

/// Body for `POST /schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequest {
    /// Event id; generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Short title.
    pub title: String,
    /// The kind of event.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Start of the event.
    pub start: NaiveDateTime,
    /// End of the event.
    pub end: NaiveDateTime,
    /// Owning department.
    #[serde(default)]
    pub department: Option<String>,
    /// Owning team.
    #[serde(default)]
    pub team: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
}

impl From<EventRequest> for ScheduleEvent {
    fn from(req: EventRequest) -> Self {
        ScheduleEvent {
            id: req.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: req.title,
            event_type: req.event_type,
            start: req.start,
            end: req.end,
            department: req.department,
            team: req.team,
            description: req.description,
        }
    }
}

/// Query string for `GET /schedule/date/:date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    /// Department name or `All`.
    #[serde(default)]
    pub department: Option<String>,
    /// Team name or `All`.
    #[serde(default)]
    pub team: Option<String>,
    /// Event type or `All`.
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
}

impl EventQuery {
    /// Converts the query into a filter; an unknown event type is an error.
    pub fn into_filter(self) -> Result<EventFilter, String> {
        let event_type = match self.event_type.as_deref() {
            None | Some(ALL) => None,
            Some(value) => Some(value.parse::<EventType>()?),
        };

        Ok(EventFilter {
            department: self.department,
            team: self.team,
            event_type,
        })
    }
}

/// Query string naming a calendar month, with a 1-based `month`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1 through 12.
    pub month: u32,
}

/// Query string carrying an optional anchor date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateQuery {
    /// Anchor date; the store's current date when absent.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
