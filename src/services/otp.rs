use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::{AppError, Result};

const CHALLENGE_URL: &str = "https://api.afromessage.com/api/challenge";
const VERIFY_URL: &str = "https://api.afromessage.com/api/verify";

/// SMS one-time-password provider.
///
/// The provider owns the code end to end: it generates it, delivers it over
/// SMS and keeps the pending state needed to check a later submission. This
/// service never sees or stores the code itself.
#[async_trait]
pub trait OtpProvider: Send + Sync {
    /// Generate a fresh code and deliver it to the phone number.
    async fn send_code(&self, phone: &str) -> Result<()>;

    /// Check a submitted code against what the provider sent.
    async fn verify_code(&self, phone: &str, code: &str) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct AcknowledgeResponse {
    acknowledge: String,
}

/// AfroMessage challenge/verify API client.
#[derive(Clone)]
pub struct AfroMessageClient {
    api_token: String,
    identifier_id: String,
    sender: String,
    client: Client,
}

impl AfroMessageClient {
    pub fn new(api_token: String, identifier_id: String, sender: String) -> Self {
        Self {
            api_token,
            identifier_id,
            sender,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl OtpProvider for AfroMessageClient {
    async fn send_code(&self, phone: &str) -> Result<()> {
        let response = self
            .client
            .get(CHALLENGE_URL)
            .bearer_auth(&self.api_token)
            .query(&[
                ("from", self.identifier_id.as_str()),
                ("sender", self.sender.as_str()),
                ("to", phone),
                ("pr", "Your password reset code is: "),
                ("ps", ". Valid for 5 minutes."),
                ("sb", "0"),
                ("sa", "0"),
                ("ttl", "300"),
                ("len", "6"),
                ("t", "0"),
            ])
            .send()
            .await
            .map_err(|e| AppError::SmsDelivery(format!("SMS API error: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::SmsDelivery(format!(
                "SMS sending failed with status: {}",
                response.status()
            )));
        }

        let body: AcknowledgeResponse = response.json().await?;
        if body.acknowledge != "success" {
            return Err(AppError::SmsDelivery(format!(
                "SMS API did not acknowledge: {}",
                body.acknowledge
            )));
        }

        Ok(())
    }

    async fn verify_code(&self, phone: &str, code: &str) -> Result<bool> {
        let response = self
            .client
            .get(VERIFY_URL)
            .bearer_auth(&self.api_token)
            .query(&[("to", phone), ("code", code)])
            .send()
            .await?;

        // A rejected code comes back as a non-success acknowledge, not as an
        // HTTP error, so only transport-level failures bubble up here.
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "OTP verification failed with status: {}",
                response.status()
            )));
        }

        let body: AcknowledgeResponse = response.json().await?;
        Ok(body.acknowledge == "success")
    }
}
