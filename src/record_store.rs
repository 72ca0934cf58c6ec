use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::domain::ContactSubmission;
use crate::email_client::http_client;

const KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const KEY_SUFFIX_LEN: usize = 9;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to reach the record store")]
    Transport(#[from] reqwest::Error),
    #[error("The record store rejected the write with status {0}")]
    Rejected(u16),
}

/// Key-value persistence for submission backups.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;
}

/// A KV namespace reached over REST: `PUT {base_url}/values/{key}`.
pub struct KvRecordStore {
    http_client: Client,
    base_url: String,
    api_token: Secret<String>,
}

impl KvRecordStore {
    pub fn new(
        base_url: String,
        api_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http_client: http_client(timeout)?,
            base_url,
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for KvRecordStore {
    async fn put(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let url = format!("{}/values/{}", self.base_url, key);
        let response = self
            .http_client
            .put(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(value)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub business: &'a str,
    pub tier: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    pub message: &'a str,
    pub submitted_at: String,
}

impl<'a> StoredSubmission<'a> {
    pub fn new(submission: &'a ContactSubmission, submitted_at: String) -> Self {
        Self {
            name: &submission.name,
            email: submission.email.as_ref(),
            business: &submission.business,
            tier: submission.tier.code(),
            phone: submission.phone.as_deref(),
            message: &submission.message,
            submitted_at,
        }
    }
}

/// `submission_{unix millis}_{9 base36 chars}`.
pub fn submission_key(at: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .map(|_| KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())] as char)
        .collect();
    format!("submission_{}_{}", at.timestamp_millis(), suffix)
}
