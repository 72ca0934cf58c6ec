use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::{EmailClientSettings, EmailProvider, RecordStoreSettings, Settings};
use crate::email_client::{EmailSender, PostmarkClient, SendGridClient, Web3FormsClient};
use crate::record_store::{KvRecordStore, RecordStore};
use crate::relay::ContactRelay;
use crate::routes;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Validates the configuration and binds the listener.
    /// Misconfiguration is reported here, before any request is served.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let relay = build_relay(&configuration)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, relay)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn build_relay(configuration: &Settings) -> Result<ContactRelay, anyhow::Error> {
    let email_client = &configuration.email_client;
    let from = email_client
        .sender()
        .map_err(anyhow::Error::msg)
        .context("Invalid sender email address")?;
    let to = email_client
        .recipient()
        .map_err(anyhow::Error::msg)
        .context("Invalid recipient email address")?;
    let sender = build_email_sender(email_client)?;
    let store = configuration
        .record_store
        .as_ref()
        .map(build_record_store)
        .transpose()?;

    Ok(ContactRelay::new(
        sender,
        store,
        from,
        to,
        configuration.application.site_name.clone(),
    ))
}

fn build_email_sender(
    settings: &EmailClientSettings,
) -> Result<Option<Arc<dyn EmailSender>>, anyhow::Error> {
    let provider = match settings
        .provider_config()
        .map_err(anyhow::Error::msg)
        .context("Invalid email provider configuration")?
    {
        Some(provider) => provider,
        None => {
            tracing::warn!("No email provider configured, contact submissions will fail");
            return Ok(None);
        }
    };

    let base_url = settings.base_url.clone();
    let timeout = settings.timeout();
    let sender: Arc<dyn EmailSender> = match provider.provider {
        EmailProvider::Postmark => {
            Arc::new(PostmarkClient::new(base_url, provider.api_key, timeout)?)
        }
        EmailProvider::SendGrid => {
            Arc::new(SendGridClient::new(base_url, provider.api_key, timeout)?)
        }
        EmailProvider::Web3Forms => {
            Arc::new(Web3FormsClient::new(base_url, provider.api_key, timeout)?)
        }
    };
    tracing::info!(provider = sender.provider(), "Email provider configured");
    Ok(Some(sender))
}

fn build_record_store(settings: &RecordStoreSettings) -> Result<Arc<dyn RecordStore>, anyhow::Error> {
    let store = KvRecordStore::new(
        settings.base_url.clone(),
        settings.api_token.clone(),
        settings.timeout(),
    )?;
    Ok(Arc::new(store))
}

pub fn run(listener: TcpListener, relay: ContactRelay) -> Result<Server, std::io::Error> {
    let relay = Data::new(relay);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(
                web::resource("/health")
                    .route(web::get().to(routes::health_check::health_check))
                    .default_service(web::to(routes::fallback::fallback)),
            )
            .service(
                web::resource("/api/contact")
                    .route(web::post().to(routes::contact::submit_contact))
                    .default_service(web::to(routes::fallback::fallback)),
            )
            .default_service(web::to(routes::fallback::fallback))
            .app_data(relay.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
