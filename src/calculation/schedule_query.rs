//! Schedule event lookup by date with department, team and type filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EventType, ScheduleEvent};

/// Filter value that matches every event.
pub const ALL: &str = "All";

/// Optional filters applied by [`events_for`].
///
/// An unset filter, or a department/team filter equal to [`ALL`], matches
/// every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Only events owned by this department.
    #[serde(default)]
    pub department: Option<String>,
    /// Only events owned by this team.
    #[serde(default)]
    pub team: Option<String>,
    /// Only events of this type.
    #[serde(default)]
    pub event_type: Option<EventType>,
}

impl EventFilter {
    /// Returns true if `event` passes every set filter.
    pub fn matches(&self, event: &ScheduleEvent) -> bool {
        field_matches(self.department.as_deref(), event.department.as_deref())
            && field_matches(self.team.as_deref(), event.team.as_deref())
            && self
                .event_type
                .is_none_or(|event_type| event_type == event.event_type)
    }
}

fn field_matches(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(wanted) if wanted == ALL => true,
        Some(wanted) => value == Some(wanted),
    }
}

/// Returns the events occurring on `date` that pass `filter`, in insertion
/// order.
///
/// Events are matched on the full calendar date, never on the day of the
/// month alone.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{events_for, EventFilter};
/// use attendance_engine::models::{EventType, ScheduleEvent};
/// use chrono::{NaiveDate, NaiveDateTime};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let events = vec![ScheduleEvent {
///     id: "evt-1".to_string(),
///     title: "Quarterly review".to_string(),
///     event_type: EventType::Meeting,
///     start: at("2025-03-10 14:00"),
///     end: at("2025-03-10 15:00"),
///     department: Some("Finance".to_string()),
///     team: None,
///     description: None,
/// }];
///
/// let march_10 = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let april_10 = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
/// assert_eq!(events_for(&events, march_10, &EventFilter::default()).len(), 1);
/// assert!(events_for(&events, april_10, &EventFilter::default()).is_empty());
/// ```
pub fn events_for(
    events: &[ScheduleEvent],
    date: NaiveDate,
    filter: &EventFilter,
) -> Vec<ScheduleEvent> {
    events
        .iter()
        .filter(|event| event.occurs_on(date) && filter.matches(event))
        .cloned()
        .collect()
}
