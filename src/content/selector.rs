//! Daily rotation
//!
//! Maps a local wall-clock time to one tip, one fact and one spotlight.
//! The "logical day" starts at the rollover hour (7:00 by default), so the
//! same content is shown from 07:00 until 06:59 the next morning.

use super::catalog::{Catalog, HealthBite, Spotlight, WellnessTip};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

/// Hour at which the home screen switches to the next day's content
pub const DEFAULT_ROLLOVER_HOUR: u32 = 7;

/// Content selected for one logical day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyContent {
    pub day: NaiveDate,
    pub tip: WellnessTip,
    pub fact: HealthBite,
    pub spotlight: Spotlight,
}

/// Pure selector parameterised by the rollover hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySelector {
    rollover_hour: u32,
}

impl Default for DailySelector {
    fn default() -> Self {
        Self {
            rollover_hour: DEFAULT_ROLLOVER_HOUR,
        }
    }
}

impl DailySelector {
    /// Create a selector; hours past 23 are clamped to 23
    pub fn new(rollover_hour: u32) -> Self {
        Self {
            rollover_hour: rollover_hour.min(23),
        }
    }

    pub fn rollover_hour(&self) -> u32 {
        self.rollover_hour
    }

    /// The date used for rotation at `now`
    pub fn logical_day(&self, now: NaiveDateTime) -> NaiveDate {
        let date = now.date();
        if now.hour() < self.rollover_hour {
            // NaiveDate::MIN has no predecessor
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// Select the content for `now`
    pub fn select(&self, catalog: &Catalog, now: NaiveDateTime) -> DailyContent {
        let day = self.logical_day(now);
        let seed = daily_seed(day);

        DailyContent {
            day,
            tip: catalog.tips()[rotation_index(seed, catalog.tips().len())],
            fact: catalog.bites()[rotation_index(seed, catalog.bites().len())],
            spotlight: catalog.spotlights()[rotation_index(seed, catalog.spotlights().len())],
        }
    }
}

/// `year*10000 + month*100 + day`, e.g. 2024-02-10 -> 20240210
pub fn daily_seed(day: NaiveDate) -> i64 {
    i64::from(day.year()) * 10_000 + i64::from(day.month()) * 100 + i64::from(day.day())
}

/// Index into a list of `len` items; `len` must be non-zero
pub fn rotation_index(seed: i64, len: usize) -> usize {
    seed.rem_euclid(len as i64) as usize
}

/// Select with the default 7:00 rollover
pub fn select_daily(catalog: &Catalog, now: NaiveDateTime) -> DailyContent {
    DailySelector::default().select(catalog, now)
}

/// Select for the current local time
pub fn select_daily_now(catalog: &Catalog) -> DailyContent {
    select_daily(catalog, Local::now().naive_local())
}
