use std::time::Duration;

use reqwest::{Client, Response};

use crate::domain::ContactEmail;

mod postmark;
mod sendgrid;
mod web3forms;

pub use postmark::PostmarkClient;
pub use sendgrid::SendGridClient;
pub use web3forms::Web3FormsClient;

#[derive(Debug, Clone, PartialEq)]
pub struct Mailbox {
    pub email: ContactEmail,
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(email: ContactEmail, name: Option<String>) -> Self {
        Self { email, name }
    }

    /// `Name <address>`, or the bare address when there is no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Mailbox,
    pub subject: String,
    pub text_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Failed to reach the email provider")]
    Transport(#[from] reqwest::Error),
    #[error("The email provider rejected the message with status {status}")]
    Rejected { status: u16, body: String },
    #[error("The email provider refused the message: {0}")]
    Refused(String),
}

/// A single outbound email API.
#[async_trait::async_trait]
pub trait EmailSender: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Turns a non-2xx reply into `DeliveryError::Rejected`, keeping the body for the logs.
pub(crate) async fn accept_success(response: Response) -> Result<Response, DeliveryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DeliveryError::Rejected {
        status: status.as_u16(),
        body,
    })
}
