//! Week and month calendar grids.
//!
//! Every calendar view renders from a [`CalendarGridBuilder`] carrying one
//! [`WeekStart`] convention, taken from the store configuration, so that the
//! dashboard, attendance and leave calendars line up with each other.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AttendanceError, AttendanceResult};

/// Month grids are padded to at least this many rows.
pub const MIN_MONTH_ROWS: usize = 5;

/// The first day of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Sunday through Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday through Sunday.
    Monday,
}

impl WeekStart {
    /// The weekday a week begins on.
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Number of days between the start of the week and `date`.
    fn offset(&self, date: NaiveDate) -> u64 {
        let days = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        u64::from(days)
    }
}

/// A calendar year and month, with months numbered from 1.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::YearMonth;
///
/// let march = YearMonth::new(2025, 3).unwrap();
/// assert_eq!(YearMonth::from_zero_based(2025, 2).unwrap(), march);
/// assert_eq!(march.days_in_month(), 31);
/// assert!(YearMonth::new(2025, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a year/month from a 1-based month.
    pub fn new(year: i32, month: u32) -> AttendanceResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(AttendanceError::InvalidMonth { year, month })
    }

    /// Creates a year/month from a 0-based month (0 is January).
    pub fn from_zero_based(year: i32, month: u32) -> AttendanceResult<Self> {
        if month > 11 {
            return Err(AttendanceError::InvalidMonth { year, month });
        }
        Self::new(year, month + 1)
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// The 1-based month.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Every date of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.first
            .iter_days()
            .take_while(move |date| date.month() == self.first.month())
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.days().count() as u32
    }

    /// Returns true if `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    /// The date shown in the cell.
    pub date: NaiveDate,
    /// Whether the date belongs to the anchor's month rather than padding.
    pub in_current_month: bool,
}

/// Builds week and month grids with a fixed week-start convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarGridBuilder {
    week_start: WeekStart,
}

impl CalendarGridBuilder {
    /// Creates a builder using `week_start` for every grid it produces.
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    /// The week-start convention in use.
    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Builds the month grid around `anchor`.
    ///
    /// The grid starts on the week-start day on or before the 1st of the month
    /// and is made of 5 or 6 full rows of 7 cells; dates outside the month pad
    /// the first and last rows.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::{CalendarGridBuilder, WeekStart};
    /// use chrono::NaiveDate;
    ///
    /// let builder = CalendarGridBuilder::new(WeekStart::Monday);
    /// let grid = builder
    ///     .build_month_grid(NaiveDate::from_ymd_opt(2025, 3, 18).unwrap())
    ///     .unwrap();
    ///
    /// assert_eq!(grid.len() % 7, 0);
    /// // March 2025 starts on a Saturday, so the grid opens on Monday 24 February
    /// assert_eq!(grid[0].date, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
    /// assert!(!grid[0].in_current_month);
    /// assert_eq!(grid.iter().filter(|c| c.in_current_month).count(), 31);
    /// ```
    pub fn build_month_grid(&self, anchor: NaiveDate) -> AttendanceResult<Vec<CalendarCell>> {
        let month = YearMonth::of(anchor);
        let lead = self.week_start.offset(month.first_day());
        let start = month
            .first_day()
            .checked_sub_days(Days::new(lead))
            .ok_or(AttendanceError::DateOutOfRange { date: anchor })?;

        let needed = lead as usize + month.days_in_month() as usize;
        let cell_count = needed.div_ceil(7).max(MIN_MONTH_ROWS) * 7;

        let cells: Vec<CalendarCell> = start
            .iter_days()
            .take(cell_count)
            .map(|date| CalendarCell {
                date,
                in_current_month: month.contains(date),
            })
            .collect();

        if cells.len() != cell_count {
            return Err(AttendanceError::DateOutOfRange { date: anchor });
        }

        Ok(cells)
    }

    /// Returns the 7 consecutive dates of the week containing `anchor`.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::{CalendarGridBuilder, WeekStart};
    /// use chrono::NaiveDate;
    ///
    /// // Wednesday 12 March 2025
    /// let anchor = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    ///
    /// let sunday_week = CalendarGridBuilder::new(WeekStart::Sunday).build_week_grid(anchor).unwrap();
    /// assert_eq!(sunday_week[0], NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    ///
    /// let monday_week = CalendarGridBuilder::new(WeekStart::Monday).build_week_grid(anchor).unwrap();
    /// assert_eq!(monday_week[0], NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    /// assert_eq!(monday_week[6], NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
    /// ```
    pub fn build_week_grid(&self, anchor: NaiveDate) -> AttendanceResult<[NaiveDate; 7]> {
        let out_of_range = || AttendanceError::DateOutOfRange { date: anchor };

        let start = anchor
            .checked_sub_days(Days::new(self.week_start.offset(anchor)))
            .ok_or_else(out_of_range)?;

        let mut days = start.iter_days();
        let mut week = [start; 7];
        for slot in week.iter_mut() {
            *slot = days.next().ok_or_else(out_of_range)?;
        }

        Ok(week)
    }
}
