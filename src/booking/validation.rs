//! Booking form validation
//!
//! Every check here runs before any side effect. A failure leaves the form
//! untouched and is shown to the user as-is.

use super::{BookingRequest, TimeSlot};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Number of digits in a valid phone number
pub const PHONE_DIGITS: usize = 10;

/// Validation failures, displayed verbatim to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Basic `local@domain.tld` shape check
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Keep only ASCII digits, truncated to [`PHONE_DIGITS`]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}

/// Check the raw form fields and build a request from them
pub fn validate(
    full_name: &str,
    email: &str,
    phone: &str,
    date: &str,
    time_slot: Option<TimeSlot>,
) -> Result<BookingRequest, ValidationError> {
    let full_name = full_name.trim();
    let email = email.trim();
    let date = date.trim();

    let time_slot = match time_slot {
        Some(slot)
            if !full_name.is_empty()
                && !email.is_empty()
                && !phone.is_empty()
                && !date.is_empty() =>
        {
            slot
        }
        _ => return Err(ValidationError::MissingFields),
    };

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(BookingRequest {
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        date: date.to_string(),
        time_slot,
    })
}
