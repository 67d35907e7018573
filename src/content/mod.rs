//! Daily Content
//!
//! Rotating home-screen content: a wellness tip, a health bite and a
//! nutrition spotlight, chosen deterministically from the local date.

mod catalog;
mod selector;

pub use catalog::{
    Catalog, HealthBite, Spotlight, WellnessTip, HEALTH_BITES, SPOTLIGHTS, WELLNESS_TIPS,
};
pub use selector::{
    daily_seed, rotation_index, select_daily, select_daily_now, DailyContent, DailySelector,
    DEFAULT_ROLLOVER_HOUR,
};
