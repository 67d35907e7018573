//! # ARGPS
//!
//! Headless core of the ARGPS Nutritious Lifestyle wellness app: daily
//! home-screen content, consultation booking and the admin profile.
//!
//! ## Features
//!
//! - **Daily content**: tip, health bite and spotlight rotated by local date
//! - **Booking**: validated form, calendar picker, EmailJS notification
//! - **Profile**: password-gated editor persisted to a PostgREST row or local file
//! - **Navigation**: welcome screen plus a three-tab shell
//!
//! ## Modules
//!
//! - [`content`]: Daily content catalog and selector
//! - [`booking`]: Booking form, validation and calendar
//! - [`notify`]: Outbound booking notifications
//! - [`profile`]: Profile record, editor and stores
//! - [`app`]: Navigator state and session
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use argps::{Config, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let store = config.profile_store()?;
//!     let notifier = Arc::new(config.notifier()?);
//!
//!     let mut session = Session::start(store, notifier, config.session_options(None)).await;
//!     session.get_started();
//!
//!     let today = session.daily_content(chrono::Local::now().naive_local());
//!     println!("{}", today.tip.text);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod booking;
pub mod config;
pub mod content;
pub mod notify;
pub mod profile;

// Re-export top-level types for convenience
pub use app::{AppState, SaveError, Screen, Session, SessionOptions, Update};

pub use booking::{
    BookingError, BookingForm, BookingRequest, CalendarError, CalendarPicker, DayCell, TimeSlot,
    ValidationError,
};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig, StoreBackend};

pub use content::{select_daily, Catalog, DailyContent, DailySelector};

pub use notify::{EmailJsClient, EmailJsConfig, Notifier, NotifyError};

pub use profile::{
    EditorError, EditorState, EngageOutcome, Gesture, ProfileEditor, ProfileRecord, ProfileStore,
    StoreError, TriggerPolicy,
};
