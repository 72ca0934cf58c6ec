use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::email_client::{accept_success, http_client, DeliveryError, EmailSender, OutgoingEmail};

/// Forms relay: messages are delivered to the inbox tied to the access key,
/// so the configured recipient is not part of the request.
pub struct Web3FormsClient {
    http_client: Client,
    base_url: String,
    access_key: Secret<String>,
}

impl Web3FormsClient {
    pub fn new(
        base_url: String,
        access_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: http_client(timeout)?,
            base_url,
            access_key,
        })
    }
}

#[async_trait::async_trait]
impl EmailSender for Web3FormsClient {
    fn provider(&self) -> &'static str {
        "web3forms"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let url = format!("{}/submit", self.base_url);
        let request_body = SubmitRequest {
            access_key: self.access_key.expose_secret(),
            subject: &email.subject,
            from_name: email.from.name.as_deref().unwrap_or(email.from.email.as_ref()),
            name: email.reply_to.name.as_deref().unwrap_or_default(),
            email: email.reply_to.email.as_ref(),
            message: &email.text_body,
        };
        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await?;
        let reply: SubmitReply = accept_success(response).await?.json().await?;
        if reply.success {
            Ok(())
        } else {
            Err(DeliveryError::Refused(reply.message.unwrap_or_default()))
        }
    }
}

#[derive(serde::Serialize)]
struct SubmitRequest<'a> {
    access_key: &'a str,
    subject: &'a str,
    from_name: &'a str,
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(serde::Deserialize)]
struct SubmitReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}
