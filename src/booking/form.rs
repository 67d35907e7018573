//! Booking form controller

use super::calendar::{CalendarError, CalendarPicker};
use super::validation::{normalize_phone, validate, ValidationError};
use super::{BookingRequest, TimeSlot};
use crate::notify::{Notifier, NotifyError};
use thiserror::Error;

/// Why a submission did not go through
#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A booking request is already being sent")]
    InFlight,

    #[error("No booking request is being sent")]
    NotSubmitting,

    #[error("Failed to send booking request: {0}")]
    Delivery(#[from] NotifyError),
}

impl BookingError {
    /// Message shown to the user in the blocking alert
    pub fn user_message(&self) -> String {
        match self {
            BookingError::Validation(e) => e.to_string(),
            BookingError::InFlight | BookingError::NotSubmitting => self.to_string(),
            BookingError::Delivery(_) => {
                "Failed to send booking request. Please try again.".to_string()
            }
        }
    }
}

/// State of the consultation booking screen
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    full_name: String,
    email: String,
    phone: String,
    date: String,
    time_slot: Option<TimeSlot>,
    submitting: bool,
    success_visible: bool,
    calendar: CalendarPicker,
}

impl BookingForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form whose calendar opens on a specific month
    pub fn with_calendar(calendar: CalendarPicker) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time_slot(&self) -> Option<TimeSlot> {
        self.time_slot
    }

    /// Whether the submit control is disabled
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_success_visible(&self) -> bool {
        self.success_visible
    }

    pub fn calendar(&self) -> &CalendarPicker {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarPicker {
        &mut self.calendar
    }

    // Field edits are ignored while a request is in flight, like disabled inputs.

    pub fn set_full_name(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.full_name = value.into();
        }
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.email = value.into();
        }
    }

    /// Store only the first ten digits of `raw`
    pub fn update_phone(&mut self, raw: &str) {
        if self.editable() {
            self.phone = normalize_phone(raw);
        }
    }

    /// Typed date text, stored as entered
    pub fn set_date(&mut self, value: impl Into<String>) {
        if self.editable() {
            self.date = value.into();
        }
    }

    pub fn select_time_slot(&mut self, slot: TimeSlot) {
        if self.editable() {
            self.time_slot = Some(slot);
        }
    }

    /// Pick `day` of the calendar's displayed month
    pub fn select_date(&mut self, day: u32) -> Result<(), CalendarError> {
        if self.editable() {
            self.date = self.calendar.select_day(day)?;
        }
        Ok(())
    }

    pub fn clear_date(&mut self) {
        if self.editable() {
            self.calendar.clear(&mut self.date);
        }
    }

    pub fn dismiss_success(&mut self) {
        self.success_visible = false;
    }

    /// Validate and mark the form in flight.
    ///
    /// Fails without touching any state if a submission is already in
    /// flight or a field is invalid.
    pub fn begin_submit(&mut self) -> Result<BookingRequest, BookingError> {
        if self.submitting {
            return Err(BookingError::InFlight);
        }

        let request = validate(
            &self.full_name,
            &self.email,
            &self.phone,
            &self.date,
            self.time_slot,
        )?;

        self.submitting = true;
        Ok(request)
    }

    /// Apply the notifier's result to the form
    pub fn finish_submit(&mut self, result: Result<(), NotifyError>) -> Result<(), BookingError> {
        if !self.submitting {
            return Err(BookingError::NotSubmitting);
        }
        self.submitting = false;

        match result {
            Ok(()) => {
                self.reset_fields();
                self.success_visible = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Booking request not delivered, keeping form contents");
                Err(BookingError::Delivery(e))
            }
        }
    }

    /// Validate, send through `notifier` and update the form
    pub async fn submit(&mut self, notifier: &dyn Notifier) -> Result<(), BookingError> {
        let request = self.begin_submit()?;

        tracing::debug!(notifier = notifier.name(), slot = %request.time_slot, "Submitting booking");
        let result = notifier.send_booking(&request).await;

        self.finish_submit(result)
    }

    fn editable(&self) -> bool {
        if self.submitting {
            tracing::debug!("Ignoring edit while a booking request is in flight");
        }
        !self.submitting
    }

    fn reset_fields(&mut self) {
        self.full_name.clear();
        self.email.clear();
        self.phone.clear();
        self.date.clear();
        self.time_slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every request; fails when `fail` is set
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<BookingRequest>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send_booking(&self, request: &BookingRequest) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail {
                Err(NotifyError::Unavailable)
            } else {
                Ok(())
            }
        }
    }

    fn filled_form() -> BookingForm {
        let mut form = BookingForm::with_calendar(CalendarPicker::for_month(2025, 3).unwrap());
        form.set_full_name("Asha Rao");
        form.set_email("asha@example.com");
        form.update_phone("(987) 654-3210");
        form.select_date(14).unwrap();
        form.select_time_slot(TimeSlot::Morning9To10);
        form
    }

    #[tokio::test]
    async fn test_successful_submit_clears_form() {
        let notifier = RecordingNotifier::default();
        let mut form = filled_form();

        form.submit(&notifier).await.unwrap();

        assert_eq!(notifier.count(), 1);
        let sent = notifier.sent.lock().unwrap()[0].clone();
        assert_eq!(sent.phone, "9876543210");
        assert_eq!(sent.date, "14 / 03 / 2025");

        assert!(form.full_name().is_empty());
        assert!(form.email().is_empty());
        assert!(form.phone().is_empty());
        assert!(form.date().is_empty());
        assert_eq!(form.time_slot(), None);
        assert!(form.is_success_visible());
        assert!(!form.is_submitting());

        form.dismiss_success();
        assert!(!form.is_success_visible());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_fields() {
        let notifier = RecordingNotifier::failing();
        let mut form = filled_form();

        let err = form.submit(&notifier).await.unwrap_err();

        assert!(matches!(err, BookingError::Delivery(NotifyError::Unavailable)));
        assert_eq!(
            err.user_message(),
            "Failed to send booking request. Please try again."
        );
        assert_eq!(form.full_name(), "Asha Rao");
        assert_eq!(form.phone(), "9876543210");
        assert_eq!(form.time_slot(), Some(TimeSlot::Morning9To10));
        assert!(!form.is_success_visible());
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_any_missing_field_never_notifies() {
        let notifier = RecordingNotifier::default();

        let clears: [fn(&mut BookingForm); 5] = [
            |f| f.set_full_name(""),
            |f| f.set_email(""),
            |f| f.update_phone(""),
            |f| f.clear_date(),
            |f| f.time_slot = None,
        ];

        for clear in clears {
            let mut form = filled_form();
            clear(&mut form);

            let err = form.submit(&notifier).await.unwrap_err();
            assert!(matches!(
                err,
                BookingError::Validation(ValidationError::MissingFields)
            ));
            assert!(!form.is_submitting());
        }

        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_email_never_notifies() {
        let notifier = RecordingNotifier::default();
        let mut form = filled_form();
        form.set_email("asha@example");

        let err = form.submit(&notifier).await.unwrap_err();
        assert_eq!(err.user_message(), "Please enter a valid email address");
        assert_eq!(notifier.count(), 0);
        assert_eq!(form.email(), "asha@example");
    }

    #[test]
    fn test_only_one_submission_in_flight() {
        let mut form = filled_form();

        let request = form.begin_submit().unwrap();
        assert!(form.is_submitting());
        assert_eq!(request.full_name, "Asha Rao");

        assert!(matches!(form.begin_submit(), Err(BookingError::InFlight)));

        form.finish_submit(Ok(())).unwrap();
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_edits_ignored_while_in_flight() {
        let mut form = filled_form();
        form.begin_submit().unwrap();

        form.set_full_name("Someone Else");
        form.set_email("else@example.com");
        form.update_phone("1112223333");
        form.set_date("01 / 01 / 2026");
        form.select_time_slot(TimeSlot::Evening6To7);
        form.select_date(20).unwrap();
        form.clear_date();

        assert_eq!(form.full_name(), "Asha Rao");
        assert_eq!(form.email(), "asha@example.com");
        assert_eq!(form.phone(), "9876543210");
        assert_eq!(form.date(), "14 / 03 / 2025");
        assert_eq!(form.time_slot(), Some(TimeSlot::Morning9To10));

        form.finish_submit(Err(NotifyError::Timeout)).unwrap_err();
        form.set_full_name("Someone Else");
        assert_eq!(form.full_name(), "Someone Else");
    }

    #[test]
    fn test_finish_without_begin_is_rejected() {
        let mut form = filled_form();

        let err = form.finish_submit(Ok(())).unwrap_err();
        assert!(matches!(err, BookingError::NotSubmitting));
        assert!(!form.is_success_visible());
        assert_eq!(form.full_name(), "Asha Rao");
    }

    #[test]
    fn test_update_phone_truncates() {
        let mut form = BookingForm::new();
        form.update_phone("98765432101234");
        assert_eq!(form.phone(), "9876543210");
    }
}
