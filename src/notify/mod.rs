//! Outbound Notifications
//!
//! Booking requests are forwarded to the business owner by email through a
//! third-party relay. The relay is hidden behind [`Notifier`] so the booking
//! form can be driven by any implementation.

mod emailjs;

pub use emailjs::{EmailJsClient, EmailJsConfig, TemplateParams};

use crate::booking::BookingRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Delivers a booking request to the business owner
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Send one request. Implementations must not retry.
    async fn send_booking(&self, request: &BookingRequest) -> Result<(), NotifyError>;
}

/// Errors that can occur when sending a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Email relay unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

impl NotifyError {
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NotifyError::Timeout
        } else if e.is_connect() {
            NotifyError::Unavailable
        } else {
            NotifyError::Request(e)
        }
    }
}
