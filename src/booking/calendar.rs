//! Calendar picker
//!
//! A month grid with paging. The picker only tracks which month is shown and
//! whether it is open; the chosen date lives in the booking form as a
//! `DD / MM / YYYY` string.

use chrono::{Datelike, Local, Months, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Day {day} is not in {month:02}/{year}")]
    DayOutOfRange { day: u32, month: u32, year: i32 },

    #[error("Invalid month: {0}")]
    InvalidMonth(String),
}

/// One cell of the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Padding before the first day of the month
    Blank,
    Day(u32),
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPicker {
    /// First day of the displayed month
    shown: NaiveDate,
    open: bool,
}

impl Default for CalendarPicker {
    fn default() -> Self {
        Self::today()
    }
}

impl CalendarPicker {
    /// Picker showing the current local month
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self::for_month(today.year(), today.month()).unwrap_or(Self {
            shown: today,
            open: false,
        })
    }

    /// Picker showing `month` (1-12) of `year`
    pub fn for_month(year: i32, month: u32) -> Result<Self, CalendarError> {
        let shown = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CalendarError::InvalidMonth(format!("{}-{:02}", year, month)))?;
        Ok(Self { shown, open: false })
    }

    /// Parse `YYYY-MM`
    pub fn parse_month(s: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Self::for_month(year, month)
    }

    pub fn year(&self) -> i32 {
        self.shown.year()
    }

    pub fn month(&self) -> u32 {
        self.shown.month()
    }

    /// e.g. "February 2024"
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.shown.month0() as usize], self.year())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn prev_month(&mut self) {
        if let Some(prev) = self.shown.checked_sub_months(Months::new(1)) {
            self.shown = prev;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.shown.checked_add_months(Months::new(1)) {
            self.shown = next;
        }
    }

    /// Number of days in the displayed month
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Leading blanks (weekday of day 1, Sunday = 0), then days `1..=N`
    pub fn days_grid(&self) -> impl Iterator<Item = DayCell> {
        let blanks = self.shown.weekday().num_days_from_sunday() as usize;
        std::iter::repeat(DayCell::Blank)
            .take(blanks)
            .chain((1..=self.days_in_month()).map(DayCell::Day))
    }

    /// Format `day` of the displayed month and close the picker
    pub fn select_day(&mut self, day: u32) -> Result<String, CalendarError> {
        let date = self.shown.with_day(day).ok_or(CalendarError::DayOutOfRange {
            day,
            month: self.month(),
            year: self.year(),
        })?;
        self.open = false;
        Ok(format_booking_date(date))
    }

    /// Empty the date field and close the picker
    pub fn clear(&mut self, date: &mut String) {
        date.clear();
        self.open = false;
    }
}

/// Gregorian month length, leap years included
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// `DD / MM / YYYY`, zero-padded
pub fn format_booking_date(date: NaiveDate) -> String {
    date.format("%d / %m / %Y").to_string()
}

/// Inverse of [`format_booking_date`]
pub fn parse_booking_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d / %m / %Y").ok()
}
