use std::convert::{TryFrom, TryInto};

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::ContactEmail;
use crate::email_client::Mailbox;

pub const DEFAULT_RECIPIENT: &str = "lana@genaiqueen.com";

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    #[serde(default)]
    pub record_store: Option<RecordStoreSettings>,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub site_name: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    #[serde(default)]
    pub provider: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    pub sender_email: String,
    pub sender_name: String,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(serde::Deserialize, Clone)]
pub struct RecordStoreSettings {
    pub base_url: String,
    pub api_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmailProvider {
    Postmark,
    SendGrid,
    Web3Forms,
}

impl EmailProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailProvider::Postmark => "postmark",
            EmailProvider::SendGrid => "sendgrid",
            EmailProvider::Web3Forms => "web3forms",
        }
    }
}

impl TryFrom<String> for EmailProvider {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "postmark" => Ok(Self::Postmark),
            "sendgrid" => Ok(Self::SendGrid),
            "web3forms" => Ok(Self::Web3Forms),
            other => Err(format!(
                "{} is not a supported email provider. \
                Use either `postmark`, `sendgrid` or `web3forms`.",
                other
            )),
        }
    }
}

/// A provider that passed startup validation, with its credential.
#[derive(Debug)]
pub struct ProviderConfig {
    pub provider: EmailProvider,
    pub api_key: Secret<String>,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<Mailbox, String> {
        let email = ContactEmail::parse(self.sender_email.clone())?;
        Ok(Mailbox::new(email, Some(self.sender_name.clone())))
    }

    pub fn recipient(&self) -> Result<Mailbox, String> {
        let address = self
            .recipient_email
            .clone()
            .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string());
        let email = ContactEmail::parse(address)?;
        Ok(Mailbox::new(email, self.recipient_name.clone()))
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    /// `Ok(None)` when no provider is selected at all.
    pub fn provider_config(&self) -> Result<Option<ProviderConfig>, String> {
        let provider: EmailProvider = match &self.provider {
            Some(name) if !name.trim().is_empty() => name.clone().try_into()?,
            _ => return Ok(None),
        };
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| format!("`{}` requires `email_client.api_key`", provider.as_str()))?;
        if provider == EmailProvider::SendGrid && self.recipient_email.is_none() {
            return Err("`sendgrid` requires an explicit `email_client.recipient_email`".into());
        }
        Ok(Some(ProviderConfig { provider, api_key }))
    }
}

impl RecordStoreSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Read the "default" configuration file
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;

    // e.g. `APP_EMAIL_CLIENT__API_KEY=...` sets `Settings.email_client.api_key`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    settings.try_into()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
