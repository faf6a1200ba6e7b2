use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config::MailConfig;
use crate::user::errors::MailerError;
use crate::user::ports::Mailer;

/// Mail delivery through an HTTP email API (Resend-style endpoint).
///
/// The payload is minimal on purpose: this service's contract with the
/// transport is "deliver this URL to this address".
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailerError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, address: &str, url: &str) -> Result<(), MailerError> {
        let payload = json!({
            "from": self.from,
            "to": [address],
            "subject": "Your account link",
            "text": url,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Mail API rejected delivery");
            return Err(MailerError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(address = %address, "Notification dispatched");

        Ok(())
    }
}
