//! App Shell
//!
//! Screen navigation and the session that ties the home, booking and
//! profile screens to their stores and notifiers.
//!
//! ## Screens
//!
//! ```text
//! Welcome ──Get Started──▶ Home ◀──▶ Book ◀──▶ Profile
//!                          (bottom navigation bar)
//! ```

mod session;
mod state;

pub use session::{SaveError, Session, SessionOptions};
pub use state::{AppState, Screen, Update};

pub const BUSINESS_NAME: &str = "ARGPS Nutritious Lifestyle";
pub const CONSULTANT_NAME: &str = "Rithanya Gopinathan";
pub const CONSULTANT_TITLE: &str = "Wellness Consultant";
