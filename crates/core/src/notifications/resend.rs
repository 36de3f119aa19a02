//! Resend (resend.com) mail provider client.

use super::notifications_errors::NotificationError;
use super::notifications_model::EmailMessage;
use super::notifications_traits::Mailer;
use crate::errors::Result;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends email through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from_address: String,
    endpoint: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::MailerUnreachable(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            from_address: from_address.into(),
            endpoint: RESEND_ENDPOINT.to_string(),
        })
    }

}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        let payload = ResendRequest {
            from: &self.from_address,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::MailerUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Mailer {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let parsed: ResendResponse = response
            .json()
            .await
            .map_err(|e| NotificationError::MailerUnreachable(e.to_string()))?;
        debug!("Resend accepted message {}", parsed.id);
        Ok(parsed.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let payload = ResendRequest {
            from: "FinClue <alerts@finclue.app>",
            to: ["user@example.com"],
            subject: "Dip alert",
            html: "<p>hi</p>",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from"], "FinClue <alerts@finclue.app>");
        assert_eq!(json["to"][0], "user@example.com");
        assert!(json["html"].as_str().is_some());
    }

    #[test]
    fn test_response_parses_id() {
        let parsed: ResendResponse =
            serde_json::from_str(r#"{"id":"49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}"#).unwrap();
        assert_eq!(parsed.id, "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794");
    }
}
