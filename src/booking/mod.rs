//! Consultation Booking
//!
//! The booking screen: form state, client-side validation, the embedded
//! calendar picker and the hand-off to the outbound notifier.
//!
//! ## Flow
//!
//! 1. The user fills in name, email, phone, date and time slot
//! 2. [`BookingForm::begin_submit`] validates and marks the form in flight
//! 3. The [`BookingRequest`] goes to a [`crate::notify::Notifier`]
//! 4. [`BookingForm::finish_submit`] clears the form or keeps it for retry

mod calendar;
mod form;
mod validation;

pub use calendar::{
    days_in_month, format_booking_date, parse_booking_date, CalendarError, CalendarPicker,
    DayCell,
};
pub use form::{BookingError, BookingForm};
pub use validation::{is_valid_email, normalize_phone, validate, ValidationError, PHONE_DIGITS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four consultation slots offered on the booking screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "Morning (9:00 AM - 10:00 AM)")]
    Morning9To10,
    #[serde(rename = "Evening (4:00 PM - 5:00 PM)")]
    Evening4To5,
    #[serde(rename = "Evening (5:00 PM - 6:00 PM)")]
    Evening5To6,
    #[serde(rename = "Evening (6:00 PM - 7:00 PM)")]
    Evening6To7,
}

impl TimeSlot {
    /// All slots in display order
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning9To10,
        TimeSlot::Evening4To5,
        TimeSlot::Evening5To6,
        TimeSlot::Evening6To7,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning9To10 => "Morning (9:00 AM - 10:00 AM)",
            TimeSlot::Evening4To5 => "Evening (4:00 PM - 5:00 PM)",
            TimeSlot::Evening5To6 => "Evening (5:00 PM - 6:00 PM)",
            TimeSlot::Evening6To7 => "Evening (6:00 PM - 7:00 PM)",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses either the full label or a 1-based position ("1".."4")
impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(position) = s.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| TimeSlot::ALL.get(i).copied())
                .ok_or_else(|| format!("Time slot must be between 1 and {}", TimeSlot::ALL.len()));
        }

        TimeSlot::ALL
            .iter()
            .find(|slot| slot.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown time slot: {}", s))
    }
}

/// A validated consultation request, built per submission and never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// `DD / MM / YYYY`
    pub date: String,
    pub time_slot: TimeSlot,
}

impl BookingRequest {
    /// Free-text body of the notification email
    pub fn message(&self) -> String {
        format!(
            "New Booking Request from ARGPS App.\n\n\
             Client Name: {}\n\
             Client Email: {}\n\
             Client Phone: {}\n\
             Requested Date: {}\n\
             Requested Time: {}",
            self.full_name, self.email, self.phone, self.date, self.time_slot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slot_parse() {
        assert_eq!("1".parse::<TimeSlot>().unwrap(), TimeSlot::Morning9To10);
        assert_eq!("4".parse::<TimeSlot>().unwrap(), TimeSlot::Evening6To7);
        assert_eq!(
            "evening (5:00 pm - 6:00 pm)".parse::<TimeSlot>().unwrap(),
            TimeSlot::Evening5To6
        );
        assert!("0".parse::<TimeSlot>().is_err());
        assert!("5".parse::<TimeSlot>().is_err());
        assert!("Lunch".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn test_time_slot_serializes_as_label() {
        let json = serde_json::to_string(&TimeSlot::Evening4To5).unwrap();
        assert_eq!(json, "\"Evening (4:00 PM - 5:00 PM)\"");
    }

    #[test]
    fn test_request_message() {
        let request = BookingRequest {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            date: "05 / 03 / 2025".to_string(),
            time_slot: TimeSlot::Morning9To10,
        };

        let message = request.message();
        assert!(message.starts_with("New Booking Request from ARGPS App."));
        assert!(message.contains("Client Phone: 9876543210"));
        assert!(message.contains("Requested Time: Morning (9:00 AM - 10:00 AM)"));
    }
}
