use std::time::Duration;

use async_trait::async_trait;

use crate::error::{MailerError, Result};
use crate::traits::{EmailTransport, OutgoingEmail};

pub const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Client for the Resend transactional email API.
pub struct ResendClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ResendClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("letranido-mailer")
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl EmailTransport for ResendClient {
    async fn send_batch(&self, messages: &[OutgoingEmail]) -> Result<usize> {
        if messages.is_empty() {
            return Ok(0);
        }

        let url = format!("{}/emails/batch", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(messages)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::ProviderError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(messages.len())
    }

    fn name(&self) -> &'static str {
        "Resend"
    }
}
