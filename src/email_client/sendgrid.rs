use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::email_client::{
    accept_success, http_client, DeliveryError, EmailSender, Mailbox, OutgoingEmail,
};

pub struct SendGridClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl SendGridClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: http_client(timeout)?,
            base_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl EmailSender for SendGridClient {
    fn provider(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let url = format!("{}/v3/mail/send", self.base_url);
        let request_body = MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address::from(&email.to)],
                subject: &email.subject,
            }],
            from: Address::from(&email.from),
            reply_to: Address::from(&email.reply_to),
            content: vec![Content {
                kind: "text/plain",
                value: &email.text_body,
            }],
        };
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?;
        accept_success(response).await?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    content: Vec<Content<'a>>,
}

#[derive(serde::Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
    subject: &'a str,
}

#[derive(serde::Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> From<&'a Mailbox> for Address<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        Self {
            email: mailbox.email.as_ref(),
            name: mailbox.name.as_deref(),
        }
    }
}

#[derive(serde::Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}
