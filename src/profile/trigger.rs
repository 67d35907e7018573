//! Avatar gesture policy
//!
//! Which avatar gesture opens the admin password prompt is a product
//! setting: either a plain tap or a press held for a minimum duration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A completed interaction with the avatar image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    /// Press released after being held for the given time
    Press(Duration),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "lowercase")]
pub enum TriggerPolicy {
    /// Any tap or press opens the prompt
    #[default]
    Tap,
    /// Only a press held at least `hold_secs` seconds opens the prompt
    Hold { hold_secs: u64 },
}

impl TriggerPolicy {
    pub fn accepts(&self, gesture: Gesture) -> bool {
        match (self, gesture) {
            (TriggerPolicy::Tap, _) => true,
            (TriggerPolicy::Hold { .. }, Gesture::Tap) => false,
            (TriggerPolicy::Hold { hold_secs }, Gesture::Press(held)) => {
                held >= Duration::from_secs(*hold_secs)
            }
        }
    }

    /// Short instruction for the user
    pub fn hint(&self) -> String {
        match self {
            TriggerPolicy::Tap => "Tap the profile photo to unlock editing".to_string(),
            TriggerPolicy::Hold { hold_secs } => format!(
                "Press and hold the profile photo for {} seconds to unlock editing",
                hold_secs
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_policy_accepts_everything() {
        let policy = TriggerPolicy::Tap;
        assert!(policy.accepts(Gesture::Tap));
        assert!(policy.accepts(Gesture::Press(Duration::from_millis(200))));
    }

    #[test]
    fn test_hold_policy() {
        let policy = TriggerPolicy::Hold { hold_secs: 3 };
        assert!(!policy.accepts(Gesture::Tap));
        assert!(!policy.accepts(Gesture::Press(Duration::from_millis(2999))));
        assert!(policy.accepts(Gesture::Press(Duration::from_secs(3))));
    }

    #[test]
    fn test_policy_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            gate: TriggerPolicy,
        }

        let parsed: Wrapper = toml::from_str("[gate]\ntrigger = \"hold\"\nhold_secs = 5\n").unwrap();
        assert_eq!(parsed.gate, TriggerPolicy::Hold { hold_secs: 5 });

        let parsed: Wrapper = toml::from_str("[gate]\ntrigger = \"tap\"\n").unwrap();
        assert_eq!(parsed.gate, TriggerPolicy::Tap);
    }
}
