//! The shared attendance and schedule state store.
//!
//! [`AttendanceStore`] is the single source of truth for attendance records,
//! schedule events and today's clock state. Every successful mutation runs all
//! registered subscriber callbacks before it returns, so a callback always
//! reads the post-mutation state through the store's accessors.
//!
//! Rejected operations (unknown date, unknown event id, clock-out while not
//! clocked in) return `false`, leave the state untouched and notify nobody.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::clock_source::{Clock, SystemClock};
use super::seed::SeedData;
use super::subscribers::{Subscribers, Subscription};
use crate::calculation::{
    CalendarGridBuilder, EventFilter, OvernightPolicy, YearMonth, elapsed, events_for,
    monthly_attendance_summary, monthly_schedule_summary,
};
use crate::config::StoreConfig;
use crate::error::AttendanceResult;
use crate::models::{
    AttendanceRecord, AttendanceRecordPatch, AttendanceStatus, AttendanceSummary, ClockTime,
    ScheduleEvent, ScheduleEventPatch, ScheduleSummary, TodayAttendanceState, WorkTimeline,
    WorkingHours,
};

/// Recomputes working hours from the clock readings of a worked record.
///
/// Records whose status is not a worked status, or that lack either reading,
/// are left alone.
pub(crate) fn settle_working_hours(
    record: &mut AttendanceRecord,
    overnight: OvernightPolicy,
) -> AttendanceResult<()> {
    if !record.status.is_worked() {
        return Ok(());
    }
    if let (Some(clock_in), Some(clock_out)) = (record.clock_in, record.clock_out) {
        record.working_hours = Some(elapsed(clock_in, clock_out, overnight)?);
    }
    Ok(())
}

/// Hours worked beyond the standard day, rounded to 2 decimal places.
pub(crate) fn overtime_beyond(worked: WorkingHours, standard_day_hours: Decimal) -> Option<Decimal> {
    let hours = worked.as_decimal_hours();
    (hours > standard_day_hours).then(|| (hours - standard_day_hours).round_dp(2))
}

fn upsert_event(events: &mut Vec<ScheduleEvent>, event: ScheduleEvent) -> bool {
    match events.iter_mut().find(|existing| existing.id == event.id) {
        Some(existing) => {
            *existing = event;
            true
        }
        None => {
            events.push(event);
            false
        }
    }
}

/// A serializable copy of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Today's clock state.
    pub today: TodayAttendanceState,
    /// All attendance records, oldest first.
    pub records: Vec<AttendanceRecord>,
    /// All schedule events in insertion order.
    pub events: Vec<ScheduleEvent>,
}

/// The attendance and schedule state store.
///
/// Construct one instance at application start and hand it to every consumer;
/// accessors return copies, so nothing a consumer does to a returned value
/// reaches the store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use attendance_engine::config::StoreConfig;
/// use attendance_engine::store::{AttendanceStore, FixedClock, SeedData};
/// use chrono::NaiveDateTime;
///
/// let now = NaiveDateTime::parse_from_str("2025-03-12 08:55", "%Y-%m-%d %H:%M").unwrap();
/// let mut store = AttendanceStore::new(
///     StoreConfig::default(),
///     SeedData::default(),
///     Arc::new(FixedClock::new(now)),
/// );
///
/// let notified = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&notified);
/// let subscription = store.subscribe(move |store| {
///     assert!(store.get_today_attendance().is_clocked);
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert!(store.clock_in(None));
/// assert_eq!(notified.load(Ordering::SeqCst), 1);
/// assert_eq!(store.get_today_attendance().clock_in.unwrap().to_string(), "08:55");
///
/// subscription.unsubscribe();
/// ```
pub struct AttendanceStore {
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    records: BTreeMap<NaiveDate, AttendanceRecord>,
    events: Vec<ScheduleEvent>,
    today: TodayAttendanceState,
    subscribers: Subscribers,
}

impl AttendanceStore {
    /// Creates a store holding `seed`, reading the current time from `clock`.
    ///
    /// Working hours of worked seed records are recomputed from their clock
    /// readings, and unset overtime is derived from them. A seed record whose
    /// span the overnight policy rejects is dropped with a warning.
    pub fn new(config: StoreConfig, seed: SeedData, clock: Arc<dyn Clock>) -> Self {
        let mut records = BTreeMap::new();
        for mut record in seed.records {
            if let Err(err) = settle_working_hours(&mut record, config.overnight) {
                warn!(date = %record.date, error = %err, "Seed record dropped");
                continue;
            }
            if record.overtime_hours.is_none() {
                record.overtime_hours = record
                    .working_hours
                    .filter(|_| record.status.is_worked())
                    .and_then(|hours| overtime_beyond(hours, config.standard_day_hours));
            }
            records.insert(record.date, record);
        }

        let mut events = Vec::with_capacity(seed.events.len());
        for event in seed.events {
            upsert_event(&mut events, event);
        }

        let date = clock.now().date();
        let today = TodayAttendanceState::derive(date, records.get(&date), config.default_location);

        info!(
            records = records.len(),
            events = events.len(),
            today = %date,
            week_start = ?config.week_start,
            "Attendance store initialised"
        );

        Self {
            config,
            clock,
            records,
            events,
            today,
            subscribers: Subscribers::default(),
        }
    }

    /// Creates a store on the host clock seeded with demo data for this month.
    pub fn with_demo_data(config: StoreConfig) -> Self {
        let clock = Arc::new(SystemClock);
        let seed = SeedData::demo(clock.now().date(), &config);
        Self::new(config, seed, clock)
    }

    /// The configuration the store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Today's date according to the store's clock.
    pub fn current_date(&self) -> NaiveDate {
        self.clock.now().date()
    }

    /// A grid builder using the store's week-start convention.
    pub fn calendar(&self) -> CalendarGridBuilder {
        self.config.calendar()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns a copy of today's clock state.
    ///
    /// If the clock has moved past midnight since the last mutation, the state
    /// is derived for the new date without changing the store.
    pub fn get_today_attendance(&self) -> TodayAttendanceState {
        let date = self.current_date();
        if self.today.date == date {
            self.today.clone()
        } else {
            TodayAttendanceState::derive(date, self.records.get(&date), self.config.default_location)
        }
    }

    /// Returns a copy of the record for `date`, if one exists.
    pub fn get_attendance_record(&self, date: NaiveDate) -> Option<AttendanceRecord> {
        self.records.get(&date).cloned()
    }

    /// Returns a copy of every record, keyed by date.
    pub fn get_all_attendance_data(&self) -> BTreeMap<NaiveDate, AttendanceRecord> {
        self.records.clone()
    }

    /// Returns a copy of every schedule event in insertion order.
    pub fn get_schedule_data(&self) -> Vec<ScheduleEvent> {
        self.events.clone()
    }

    /// Returns a copy of the event with `id`, if one exists.
    pub fn get_schedule_event(&self, id: &str) -> Option<ScheduleEvent> {
        self.events.iter().find(|event| event.id == id).cloned()
    }

    /// Returns a serializable copy of the whole store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            today: self.get_today_attendance(),
            records: self.records.values().cloned().collect(),
            events: self.events.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Attendance mutations
    // ------------------------------------------------------------------

    /// Clocks in for today at `time`, or at the current time if `None`.
    ///
    /// Today's record is created if missing, set to `present` at the default
    /// location, and given a work timeline starting at the clock-in. Clocking
    /// in again restarts the day: any earlier clock-out, working hours and
    /// overtime are cleared. Always succeeds.
    pub fn clock_in(&mut self, time: Option<ClockTime>) -> bool {
        let now = self.clock.now();
        let date = now.date();
        let time = time.unwrap_or_else(|| ClockTime::from_naive(now.time()));

        let record = self
            .records
            .entry(date)
            .or_insert_with(|| AttendanceRecord::new(date, AttendanceStatus::Present));

        let (expected_start, expected_end) = record
            .timeline
            .as_ref()
            .map(|timeline| (timeline.expected_start, timeline.expected_end))
            .unwrap_or((self.config.expected_start, self.config.expected_end));

        record.status = AttendanceStatus::Present;
        record.clock_in = Some(time);
        record.clock_out = None;
        record.working_hours = None;
        record.overtime_hours = None;
        record.location = Some(self.config.default_location);
        record.timeline = Some(WorkTimeline {
            expected_start,
            expected_end,
            actual_start: Some(time),
            actual_end: None,
        });

        self.today = TodayAttendanceState::derive(date, Some(&*record), self.config.default_location);

        debug!(date = %date, clock_in = %time, "Clocked in");
        self.notify();
        true
    }

    /// Clocks out for today at `time`, or at the current time if `None`.
    ///
    /// Returns false without changing anything unless today has a clock-in
    /// with no clock-out yet, or when the span would cross midnight under
    /// [`OvernightPolicy::Reject`]. On success the working hours and any
    /// overtime beyond the standard day are stored on today's record.
    pub fn clock_out(&mut self, time: Option<ClockTime>) -> bool {
        let now = self.clock.now();
        let date = now.date();
        let time = time.unwrap_or_else(|| ClockTime::from_naive(now.time()));

        let Some(record) = self.records.get_mut(&date) else {
            debug!(date = %date, "Clock-out rejected: no record for today");
            return false;
        };

        let Some(clock_in) = record.clock_in.filter(|_| record.clock_out.is_none()) else {
            debug!(date = %date, "Clock-out rejected: not clocked in");
            return false;
        };

        let worked = match elapsed(clock_in, time, self.config.overnight) {
            Ok(worked) => worked,
            Err(err) => {
                warn!(date = %date, error = %err, "Clock-out rejected");
                return false;
            }
        };

        record.clock_out = Some(time);
        record.working_hours = Some(worked);
        record.overtime_hours = overtime_beyond(worked, self.config.standard_day_hours);
        match record.timeline.as_mut() {
            Some(timeline) => timeline.actual_end = Some(time),
            None => {
                record.timeline = Some(WorkTimeline {
                    expected_start: self.config.expected_start,
                    expected_end: self.config.expected_end,
                    actual_start: Some(clock_in),
                    actual_end: Some(time),
                })
            }
        }

        self.today = TodayAttendanceState::derive(date, Some(&*record), self.config.default_location);

        debug!(date = %date, clock_out = %time, working_hours = %worked, "Clocked out");
        self.notify();
        true
    }

    /// Sets the status of an existing record and merges `patch` into it.
    ///
    /// Returns false if there is no record for `date`, or if the merged clock
    /// readings describe a span the overnight policy rejects. Working hours
    /// are recomputed for worked statuses. A patch that moves a clock reading
    /// also re-derives overtime (unless it sets overtime itself) and the
    /// timeline's actual start and end. Today's state is re-derived when
    /// `date` is today.
    pub fn update_attendance_status(
        &mut self,
        date: NaiveDate,
        status: AttendanceStatus,
        patch: Option<AttendanceRecordPatch>,
    ) -> bool {
        let Some(existing) = self.records.get(&date) else {
            debug!(date = %date, "Status update rejected: no record");
            return false;
        };

        let mut updated = existing.clone();
        updated.status = status;
        let mut punches_changed = false;
        let mut overtime_given = false;
        if let Some(patch) = patch {
            punches_changed = patch.clock_in.is_some() || patch.clock_out.is_some();
            overtime_given = patch.overtime_hours.is_some();
            patch.apply_to(&mut updated);
        }

        if let Err(err) = settle_working_hours(&mut updated, self.config.overnight) {
            warn!(date = %date, error = %err, "Status update rejected");
            return false;
        }

        if punches_changed {
            if !overtime_given && updated.status.is_worked() {
                updated.overtime_hours = updated
                    .working_hours
                    .and_then(|hours| overtime_beyond(hours, self.config.standard_day_hours));
            }
            let timeline = updated.timeline.get_or_insert(WorkTimeline {
                expected_start: self.config.expected_start,
                expected_end: self.config.expected_end,
                actual_start: None,
                actual_end: None,
            });
            timeline.actual_start = updated.clock_in;
            timeline.actual_end = updated.clock_out;
        }

        self.records.insert(date, updated);

        if date == self.current_date() {
            self.today = TodayAttendanceState::derive(
                date,
                self.records.get(&date),
                self.config.default_location,
            );
        }

        debug!(date = %date, status = ?status, "Attendance status updated");
        self.notify();
        true
    }

    // ------------------------------------------------------------------
    // Schedule mutations
    // ------------------------------------------------------------------

    /// Adds `event` to the end of the schedule.
    ///
    /// An event whose id is already present replaces that event in place, so
    /// ids stay unique. Always succeeds.
    pub fn add_schedule_event(&mut self, event: ScheduleEvent) -> bool {
        let id = event.id.clone();
        let replaced = upsert_event(&mut self.events, event);

        debug!(event_id = %id, replaced, "Schedule event added");
        self.notify();
        true
    }

    /// Merges `patch` into the event with `id`; false if there is none.
    pub fn update_schedule_event(&mut self, id: &str, patch: ScheduleEventPatch) -> bool {
        let Some(event) = self.events.iter_mut().find(|event| event.id == id) else {
            debug!(event_id = %id, "Schedule update rejected: unknown id");
            return false;
        };

        patch.apply_to(event);

        debug!(event_id = %id, "Schedule event updated");
        self.notify();
        true
    }

    /// Removes the event with `id`; false if there is none.
    pub fn delete_schedule_event(&mut self, id: &str) -> bool {
        let Some(index) = self.events.iter().position(|event| event.id == id) else {
            debug!(event_id = %id, "Schedule delete rejected: unknown id");
            return false;
        };

        self.events.remove(index);

        debug!(event_id = %id, "Schedule event deleted");
        self.notify();
        true
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Events occurring on `date` that pass `filter`.
    pub fn events_for(&self, date: NaiveDate, filter: &EventFilter) -> Vec<ScheduleEvent> {
        events_for(&self.events, date, filter)
    }

    /// Attendance rollup for `month`, recomputed from the current records.
    pub fn monthly_attendance_summary(&self, month: YearMonth) -> AttendanceSummary {
        monthly_attendance_summary(&self.records, month)
    }

    /// Schedule rollup for `month`, recomputed from the current events.
    pub fn monthly_schedule_summary(&self, month: YearMonth, filter: &EventFilter) -> ScheduleSummary {
        monthly_schedule_summary(&self.events, month, filter)
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Registers `callback` to run after every successful mutation.
    ///
    /// The callback receives the store so it can re-read state through the
    /// accessors. Keep the returned [`Subscription`] to remove it later.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AttendanceStore) + Send + Sync + 'static,
    {
        self.subscribers.add(Arc::new(callback))
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&self) {
        for callback in self.subscribers.snapshot() {
            callback(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, WorkLocation};
    use crate::store::FixedClock;
    use chrono::NaiveDateTime;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_store(now: &str, seed: SeedData) -> (AttendanceStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at(now)));
        let store = AttendanceStore::new(StoreConfig::default(), seed, clock.clone());
        (store, clock)
    }

    fn counter(store: &AttendanceStore) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let subscription = store.subscribe(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, subscription)
    }

    fn meeting(id: &str, start: &str, end: &str) -> ScheduleEvent {
        ScheduleEvent {
            id: id.to_string(),
            title: id.to_string(),
            event_type: EventType::Meeting,
            start: at(start),
            end: at(end),
            department: Some("Engineering".to_string()),
            team: None,
            description: None,
        }
    }

    fn seed_with_record(record: AttendanceRecord) -> SeedData {
        SeedData {
            records: vec![record],
            events: vec![],
        }
    }

    // ==========================================================================
    // Clock-in / clock-out
    // ==========================================================================

    #[test]
    fn test_clock_in_then_out_round_trip() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());

        assert!(store.clock_in(Some(time("09:10"))));
        assert!(store.get_today_attendance().is_clocked);

        assert!(store.clock_out(Some(time("17:40"))));

        let today = store.get_today_attendance();
        assert!(!today.is_clocked);
        let expected = elapsed(time("09:10"), time("17:40"), OvernightPolicy::Reject).unwrap();
        assert_eq!(today.working_hours, Some(expected));

        let record = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(record.working_hours, Some(expected));
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn test_clock_in_defaults_to_clock_time() {
        let (mut store, _) = create_test_store("2025-03-12 08:47", SeedData::default());
        assert!(store.clock_in(None));
        assert_eq!(store.get_today_attendance().clock_in, Some(time("08:47")));
    }

    #[test]
    fn test_clock_out_defaults_to_clock_time() {
        let (mut store, clock) = create_test_store("2025-03-12 09:00", SeedData::default());
        store.clock_in(None);
        clock.set(at("2025-03-12 17:15"));
        assert!(store.clock_out(None));
        assert_eq!(
            store.get_today_attendance().working_hours,
            Some(WorkingHours::from_minutes(495))
        );
    }

    #[test]
    fn test_clock_in_sets_timeline_and_location() {
        let mut seeded = AttendanceRecord::new(make_date("2025-03-12"), AttendanceStatus::Today);
        seeded.location = Some(WorkLocation::Remote);
        let (mut store, _) = create_test_store("2025-03-12 08:00", seed_with_record(seeded));

        store.clock_in(Some(time("09:05")));

        let record = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.location, Some(WorkLocation::Office));
        let timeline = record.timeline.unwrap();
        assert_eq!(timeline.actual_start, Some(time("09:05")));
        assert_eq!(timeline.expected_start, time("09:00"));
        assert_eq!(timeline.actual_end, None);
    }

    #[test]
    fn test_clock_out_without_clock_in_is_rejected() {
        let (mut store, _) = create_test_store("2025-03-12 17:00", SeedData::default());
        let (count, _subscription) = counter(&store);
        let before = store.get_today_attendance();

        assert!(!store.clock_out(Some(time("17:00"))));

        assert_eq!(store.get_today_attendance(), before);
        assert!(store.get_attendance_record(make_date("2025-03-12")).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clock_out_with_unpunched_today_record_is_rejected() {
        let seeded = AttendanceRecord::new(make_date("2025-03-12"), AttendanceStatus::Today);
        let (mut store, _) = create_test_store("2025-03-12 17:00", seed_with_record(seeded));
        assert!(!store.clock_out(None));
    }

    #[test]
    fn test_second_clock_out_is_rejected() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("09:00")));
        assert!(store.clock_out(Some(time("17:00"))));

        let (count, _subscription) = counter(&store);
        assert!(!store.clock_out(Some(time("18:00"))));
        assert_eq!(store.get_today_attendance().clock_out, Some(time("17:00")));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clock_in_after_clock_out_restarts_the_day() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("09:00")));
        store.clock_out(Some(time("19:00")));

        assert!(store.clock_in(Some(time("20:00"))));

        let today = store.get_today_attendance();
        assert!(today.is_clocked);
        assert_eq!(today.clock_out, None);
        assert_eq!(today.working_hours, None);
        let record = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(record.overtime_hours, None);
    }

    #[test]
    fn test_overnight_clock_out_rejected_by_default() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("22:00")));

        assert!(!store.clock_out(Some(time("06:00"))));
        assert!(store.get_today_attendance().is_clocked);
    }

    #[test]
    fn test_overnight_clock_out_rolls_over_when_configured() {
        let config = StoreConfig {
            overnight: OvernightPolicy::RollOver,
            ..StoreConfig::default()
        };
        let clock = Arc::new(FixedClock::new(at("2025-03-12 08:00")));
        let mut store = AttendanceStore::new(config, SeedData::default(), clock);
        store.clock_in(Some(time("22:00")));

        assert!(store.clock_out(Some(time("06:00"))));
        assert_eq!(
            store.get_today_attendance().working_hours,
            Some(WorkingHours::from_minutes(480))
        );
    }

    #[test]
    fn test_clock_out_records_overtime() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("08:00")));
        store.clock_out(Some(time("18:45")));

        let record = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(record.overtime_hours, Some(dec("2.75")));
        assert_eq!(record.timeline.unwrap().actual_end, Some(time("18:45")));
    }

    #[test]
    fn test_standard_day_has_no_overtime() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("09:00")));
        store.clock_out(Some(time("17:00")));

        let record = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(record.overtime_hours, None);
    }

    #[test]
    fn test_today_state_follows_clock_past_midnight() {
        let (mut store, clock) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.clock_in(Some(time("09:00")));

        clock.set(at("2025-03-13 00:05"));
        let today = store.get_today_attendance();
        assert_eq!(today.date, make_date("2025-03-13"));
        assert!(!today.is_clocked);
        assert_eq!(today.status, AttendanceStatus::NoRecord);

        // yesterday's open clock-in cannot be closed from the new day
        assert!(!store.clock_out(None));
    }

    // ==========================================================================
    // Status updates
    // ==========================================================================

    #[test]
    fn test_update_status_on_missing_date_is_rejected() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let (count, _subscription) = counter(&store);

        assert!(!store.update_attendance_status(
            make_date("2099-01-01"),
            AttendanceStatus::Present,
            None
        ));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_update_status_merges_patch_and_recomputes_hours() {
        let record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Absent);
        let (mut store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));

        let patch = AttendanceRecordPatch {
            clock_in: Some(time("09:30")),
            clock_out: Some(time("18:00")),
            notes: Some("Badge reader offline".to_string()),
            ..Default::default()
        };
        assert!(store.update_attendance_status(
            make_date("2025-03-10"),
            AttendanceStatus::Late,
            Some(patch)
        ));

        let updated = store.get_attendance_record(make_date("2025-03-10")).unwrap();
        assert_eq!(updated.status, AttendanceStatus::Late);
        assert_eq!(updated.working_hours, Some(WorkingHours::from_minutes(510)));
        assert_eq!(updated.notes.as_deref(), Some("Badge reader offline"));
    }

    #[test]
    fn test_update_status_rejects_inverted_span() {
        let mut record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Present);
        record.clock_in = Some(time("09:00"));
        let (mut store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record.clone()));

        let patch = AttendanceRecordPatch {
            clock_out: Some(time("08:00")),
            ..Default::default()
        };
        assert!(!store.update_attendance_status(
            make_date("2025-03-10"),
            AttendanceStatus::Present,
            Some(patch)
        ));
        assert_eq!(store.get_attendance_record(make_date("2025-03-10")), Some(record));
    }

    #[test]
    fn test_update_status_for_today_rederives_today_state() {
        let record = AttendanceRecord::new(make_date("2025-03-12"), AttendanceStatus::Today);
        let (mut store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));

        assert!(store.update_attendance_status(
            make_date("2025-03-12"),
            AttendanceStatus::Leave,
            None
        ));
        assert_eq!(store.get_today_attendance().status, AttendanceStatus::Leave);
    }

    #[test]
    fn test_update_status_clock_change_rederives_overtime_and_timeline() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        assert!(store.clock_in(Some(time("08:00"))));
        assert!(store.clock_out(Some(time("19:00"))));
        let before = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(before.overtime_hours, Some(dec("3")));

        let patch = AttendanceRecordPatch {
            clock_out: Some(time("16:00")),
            ..Default::default()
        };
        assert!(store.update_attendance_status(
            make_date("2025-03-12"),
            AttendanceStatus::Present,
            Some(patch)
        ));

        let updated = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(updated.working_hours, Some(WorkingHours::from_minutes(480)));
        assert_eq!(updated.overtime_hours, None);
        let timeline = updated.timeline.unwrap();
        assert_eq!(timeline.actual_start, Some(time("08:00")));
        assert_eq!(timeline.actual_end, Some(time("16:00")));
        assert_eq!(store.get_today_attendance().clock_out, Some(time("16:00")));
    }

    #[test]
    fn test_update_status_keeps_explicit_overtime() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        assert!(store.clock_in(Some(time("08:00"))));
        assert!(store.clock_out(Some(time("19:00"))));

        let patch = AttendanceRecordPatch {
            clock_out: Some(time("17:30")),
            overtime_hours: Some(dec("0.25")),
            ..Default::default()
        };
        assert!(store.update_attendance_status(
            make_date("2025-03-12"),
            AttendanceStatus::Present,
            Some(patch)
        ));

        let updated = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(updated.working_hours, Some(WorkingHours::from_minutes(570)));
        assert_eq!(updated.overtime_hours, Some(dec("0.25")));
    }

    #[test]
    fn test_update_status_without_clock_change_keeps_overtime() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        assert!(store.clock_in(Some(time("08:00"))));
        assert!(store.clock_out(Some(time("19:00"))));

        assert!(store.update_attendance_status(
            make_date("2025-03-12"),
            AttendanceStatus::Late,
            None
        ));

        let updated = store.get_attendance_record(make_date("2025-03-12")).unwrap();
        assert_eq!(updated.overtime_hours, Some(dec("3")));
        assert_eq!(updated.timeline.unwrap().actual_end, Some(time("19:00")));
    }

    // ==========================================================================
    // Seeding
    // ==========================================================================

    #[test]
    fn test_seed_record_hours_follow_clock_readings() {
        let mut record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Present);
        record.clock_in = Some(time("09:00"));
        record.clock_out = Some(time("17:00"));
        record.working_hours = Some(WorkingHours::from_minutes(60));
        let (store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));

        let seeded = store.get_attendance_record(make_date("2025-03-10")).unwrap();
        assert_eq!(seeded.working_hours, Some(WorkingHours::from_minutes(480)));
        assert_eq!(seeded.overtime_hours, None);
    }

    #[test]
    fn test_seed_record_without_overtime_gets_it_derived() {
        let mut record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Late);
        record.clock_in = Some(time("09:30"));
        record.clock_out = Some(time("18:45"));
        let (store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));

        let seeded = store.get_attendance_record(make_date("2025-03-10")).unwrap();
        assert_eq!(seeded.working_hours, Some(WorkingHours::from_minutes(555)));
        assert_eq!(seeded.overtime_hours, Some(dec("1.25")));
    }

    #[test]
    fn test_seed_record_with_rejected_span_is_dropped() {
        let mut record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Present);
        record.clock_in = Some(time("22:00"));
        record.clock_out = Some(time("06:00"));
        let (store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));

        assert_eq!(store.get_attendance_record(make_date("2025-03-10")), None);
        assert!(store.get_all_attendance_data().is_empty());
    }

    // ==========================================================================
    // Schedule mutations
    // ==========================================================================

    #[test]
    fn test_add_preserves_insertion_order() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.add_schedule_event(meeting("b", "2025-03-14 10:00", "2025-03-14 11:00"));
        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));

        let ids: Vec<String> = store.get_schedule_data().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_with_existing_id_replaces_in_place() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));
        store.add_schedule_event(meeting("b", "2025-03-11 10:00", "2025-03-11 11:00"));

        let (count, _subscription) = counter(&store);
        let mut replacement = meeting("a", "2025-03-20 10:00", "2025-03-20 11:00");
        replacement.title = "Moved".to_string();
        assert!(store.add_schedule_event(replacement));

        let events = store.get_schedule_data();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "a");
        assert_eq!(events[0].title, "Moved");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_update_and_delete_unknown_event() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let (count, _subscription) = counter(&store);

        assert!(!store.update_schedule_event("missing", ScheduleEventPatch::default()));
        assert!(!store.delete_schedule_event("missing"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_update_and_delete_existing_event() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));

        let patch = ScheduleEventPatch {
            event_type: Some(EventType::Training),
            ..Default::default()
        };
        assert!(store.update_schedule_event("a", patch));
        assert_eq!(
            store.get_schedule_event("a").unwrap().event_type,
            EventType::Training
        );

        assert!(store.delete_schedule_event("a"));
        assert!(store.get_schedule_event("a").is_none());
        assert!(!store.delete_schedule_event("a"));
    }

    #[test]
    fn test_seed_with_duplicate_event_ids_keeps_one() {
        let seed = SeedData {
            records: vec![],
            events: vec![
                meeting("dup", "2025-03-10 10:00", "2025-03-10 11:00"),
                meeting("dup", "2025-03-11 10:00", "2025-03-11 11:00"),
            ],
        };
        let (store, _) = create_test_store("2025-03-12 08:00", seed);
        let events = store.get_schedule_data();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, at("2025-03-11 10:00"));
    }

    // ==========================================================================
    // Copies
    // ==========================================================================

    #[test]
    fn test_returned_collections_are_copies() {
        let record = AttendanceRecord::new(make_date("2025-03-10"), AttendanceStatus::Present);
        let (mut store, _) = create_test_store("2025-03-12 08:00", seed_with_record(record));
        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));

        let mut records = store.get_all_attendance_data();
        records.clear();
        let mut events = store.get_schedule_data();
        events[0].title = "changed".to_string();
        let mut today = store.get_today_attendance();
        today.is_clocked = true;

        assert_eq!(store.get_all_attendance_data().len(), 1);
        assert_eq!(store.get_schedule_data()[0].title, "a");
        assert!(!store.get_today_attendance().is_clocked);
    }

    // ==========================================================================
    // Notifications
    // ==========================================================================

    #[test]
    fn test_every_subscriber_fires_once_per_mutation() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let subscriptions: Vec<_> = (0..3).map(|_| counter(&store)).collect();

        store.clock_in(Some(time("09:00")));

        for (count, _) in &subscriptions {
            assert_eq!(count.load(Ordering::SeqCst), 1);
        }

        assert!(subscriptions[1].1.unsubscribe());
        store.clock_out(Some(time("17:00")));

        assert_eq!(subscriptions[0].0.load(Ordering::SeqCst), 2);
        assert_eq!(subscriptions[1].0.load(Ordering::SeqCst), 1);
        assert_eq!(subscriptions[2].0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_twice_leaves_others_registered() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let (first, first_subscription) = counter(&store);
        let (second, _second_subscription) = counter(&store);

        assert!(first_subscription.unsubscribe());
        assert!(!first_subscription.unsubscribe());
        assert_eq!(store.subscriber_count(), 1);

        store.clock_in(None);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_sees_post_mutation_state() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = store.subscribe(move |store| {
            sink.lock().unwrap().push(store.get_schedule_data().len());
        });

        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));
        store.add_schedule_event(meeting("b", "2025-03-10 12:00", "2025-03-10 13:00"));
        store.delete_schedule_event("a");

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn test_callback_can_unsubscribe_itself() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let inner_slot = Arc::clone(&slot);
        let inner_count = Arc::clone(&count);
        let subscription = store.subscribe(move |_| {
            inner_count.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = inner_slot.lock().unwrap().as_ref() {
                subscription.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(subscription);

        store.clock_in(None);
        store.clock_in(None);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    #[test]
    fn test_summaries_reflect_mutations() {
        let (mut store, _) = create_test_store("2025-03-12 08:00", SeedData::default());
        let march = YearMonth::new(2025, 3).unwrap();

        store.clock_in(Some(time("09:00")));
        assert_eq!(store.monthly_attendance_summary(march).present, 1);

        store.update_attendance_status(make_date("2025-03-12"), AttendanceStatus::Leave, None);
        let summary = store.monthly_attendance_summary(march);
        assert_eq!(summary.present, 0);
        assert_eq!(summary.leave, 1);

        store.add_schedule_event(meeting("a", "2025-03-10 10:00", "2025-03-10 11:00"));
        let schedule = store.monthly_schedule_summary(march, &EventFilter::default());
        assert_eq!(schedule.meetings, 1);
    }

    #[test]
    fn test_snapshot_contains_everything() {
        let seed = SeedData::demo(make_date("2025-03-12"), &StoreConfig::default());
        let record_count = seed.records.len();
        let event_count = seed.events.len();
        let (store, _) = create_test_store("2025-03-12 08:00", seed);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.records.len(), record_count);
        assert_eq!(snapshot.events.len(), event_count);
        assert_eq!(snapshot.today.status, AttendanceStatus::Today);
        assert!(snapshot.records.windows(2).all(|w| w[0].date < w[1].date));
    }
}
