use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::email_client::{accept_success, http_client, DeliveryError, EmailSender, OutgoingEmail};

pub struct PostmarkClient {
    http_client: Client,
    base_url: String,
    authorization_token: Secret<String>,
}

impl PostmarkClient {
    pub fn new(
        base_url: String,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: http_client(timeout)?,
            base_url,
            authorization_token,
        })
    }
}

#[async_trait::async_trait]
impl EmailSender for PostmarkClient {
    fn provider(&self) -> &'static str {
        "postmark"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let url = format!("{}/email", self.base_url);
        let request_body = SendEmailRequest {
            from: email.from.formatted(),
            to: email.to.formatted(),
            reply_to: email.reply_to.formatted(),
            subject: &email.subject,
            text_body: &email.text_body,
        };
        let response = self
            .http_client
            .post(&url)
            .header("X-Postmark-Server-Token", self.authorization_token.expose_secret())
            .json(&request_body)
            .send()
            .await?;
        accept_success(response).await?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: String,
    to: String,
    reply_to: String,
    subject: &'a str,
    text_body: &'a str,
}
