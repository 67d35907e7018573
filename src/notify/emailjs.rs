//! EmailJS REST client
//!
//! Sends the booking template through `POST /api/v1.0/email/send`.
//! See <https://www.emailjs.com/docs/rest-api/send/>.

use super::{Notifier, NotifyError};
use crate::booking::BookingRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Connection settings for the EmailJS relay
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    /// Full URL of the send endpoint
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    /// Public (browser) key, sent as `user_id`
    pub public_key: String,
    /// Display name of the person receiving booking emails
    pub recipient_name: String,
    pub request_timeout_ms: u64,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: "service_p4rnj4d".to_string(),
            template_id: "template_j21xpja".to_string(),
            public_key: "MFNYuDPIGgrfQhb5C".to_string(),
            recipient_name: "Rithanya Gopinathan".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Variables substituted into the EmailJS template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub to_name: String,
    pub from_name: String,
    pub from_email: String,
    pub from_phone: String,
    pub message: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub booking_date: String,
    pub booking_time: String,
}

impl TemplateParams {
    pub fn from_request(request: &BookingRequest, recipient_name: &str) -> Self {
        Self {
            to_name: recipient_name.to_string(),
            from_name: request.full_name.clone(),
            from_email: request.email.clone(),
            from_phone: request.phone.clone(),
            message: request.message(),
            client_name: request.full_name.clone(),
            client_email: request.email.clone(),
            client_phone: request.phone.clone(),
            booking_date: request.date.clone(),
            booking_time: request.time_slot.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams,
}

pub struct EmailJsClient {
    client: Client,
    config: EmailJsConfig,
}

impl EmailJsClient {
    pub fn new(config: EmailJsConfig) -> Result<Self, NotifyError> {
        for (field, value) in [
            ("service_id", &config.service_id),
            ("template_id", &config.template_id),
            ("public_key", &config.public_key),
        ] {
            if value.trim().is_empty() {
                return Err(NotifyError::NotConfigured(format!("{} is empty", field)));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EmailJsConfig {
        &self.config
    }

    fn send_request(&self, request: &BookingRequest) -> SendRequest<'_> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams::from_request(request, &self.config.recipient_name),
        }
    }
}

#[async_trait]
impl Notifier for EmailJsClient {
    fn name(&self) -> &str {
        "emailjs"
    }

    async fn send_booking(&self, request: &BookingRequest) -> Result<(), NotifyError> {
        let body = self.send_request(request);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(NotifyError::from_transport)?;

        if response.status().is_success() {
            tracing::info!(
                template = %self.config.template_id,
                date = %request.date,
                "Booking email sent"
            );
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "EmailJS rejected booking email");
            Err(NotifyError::ApiError {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
