//! Navigator state
//!
//! Which screen is active and the shared profile record. All changes go
//! through [`AppState::apply`].

use crate::profile::ProfileRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Welcome,
    Home,
    Book,
    Profile,
}

impl Screen {
    /// Tabs in the bottom navigation bar, in order
    pub const TABS: [Screen; 3] = [Screen::Home, Screen::Book, Screen::Profile];

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Welcome => "Welcome",
            Screen::Home => "Home",
            Screen::Book => "Book",
            Screen::Profile => "Profile",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A change to the navigator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Navigate(Screen),
    /// "Get Started" on the welcome screen
    GetStarted,
    ReplaceProfile(ProfileRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    screen: Screen,
    profile: ProfileRecord,
}

impl AppState {
    /// Start on the welcome screen with `profile` cached
    pub fn new(profile: ProfileRecord) -> Self {
        Self {
            screen: Screen::Welcome,
            profile,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn profile(&self) -> &ProfileRecord {
        &self.profile
    }

    /// The bottom bar is hidden on the welcome screen
    pub fn shows_bottom_nav(&self) -> bool {
        self.screen != Screen::Welcome
    }

    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Navigate(screen) => {
                tracing::debug!(from = %self.screen, to = %screen, "Navigate");
                self.screen = screen;
            }
            Update::GetStarted => {
                self.screen = Screen::Home;
            }
            Update::ReplaceProfile(profile) => {
                self.profile = profile.with_password_fallback();
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ProfileRecord::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_welcome() {
        let state = AppState::default();
        assert_eq!(state.screen(), Screen::Welcome);
        assert!(!state.shows_bottom_nav());
    }

    #[test]
    fn test_get_started_and_navigate() {
        let mut state = AppState::default();
        state.apply(Update::GetStarted);
        assert_eq!(state.screen(), Screen::Home);
        assert!(state.shows_bottom_nav());

        for tab in Screen::TABS {
            state.apply(Update::Navigate(tab));
            assert_eq!(state.screen(), tab);
        }
    }

    #[test]
    fn test_replace_profile_keeps_password_invariant() {
        let mut state = AppState::default();
        state.apply(Update::ReplaceProfile(ProfileRecord {
            email: "new@argps.in".to_string(),
            access_password: String::new(),
            ..ProfileRecord::default()
        }));

        assert_eq!(state.profile().email, "new@argps.in");
        assert!(!state.profile().access_password.is_empty());
    }
}
