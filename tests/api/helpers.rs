use contact_relay::configuration::{get_configuration, RecordStoreSettings, Settings};
use contact_relay::startup::Application;
use contact_relay::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const OWNER_EMAIL: &str = "owner@genaiqueen.com";

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub store_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_contact_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/contact", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.api_client
            .request(method, &format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// JSON bodies received by the email provider mock.
    pub async fn sent_emails(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// `(path, body)` of every write received by the record store mock.
    pub async fn stored_records(&self) -> Vec<(String, serde_json::Value)> {
        self.store_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| (r.url.path().to_string(), serde_json::from_slice(&r.body).unwrap()))
            .collect()
    }
}

pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "name": "Ursula Le Guin",
        "email": "ursula@guin.com",
        "business": "earthsea.com",
        "tier": "tier2",
        "phone": "555-0100",
        "message": "We would like AI assistants to recommend us."
    })
}

/// Test configuration: Postmark against a mock server, a mock KV store,
/// and an OS-assigned port.
pub fn test_configuration(email_server: &MockServer, store_server: &MockServer) -> Settings {
    let mut c = get_configuration().expect("Failed to read configuration.");
    c.application.port = 0;
    c.email_client.provider = Some("postmark".to_string());
    c.email_client.base_url = email_server.uri();
    c.email_client.api_key = Some(Secret::new("postmark-test-token".to_string()));
    c.email_client.recipient_email = Some(OWNER_EMAIL.to_string());
    c.email_client.recipient_name = None;
    c.email_client.timeout_milliseconds = 2_000;
    c.record_store = Some(RecordStoreSettings {
        base_url: store_server.uri(),
        api_token: Secret::new("kv-test-token".to_string()),
        timeout_milliseconds: 2_000,
    });
    c
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;
    let store_server = MockServer::start().await;

    let configuration = {
        let mut c = test_configuration(&email_server, &store_server);
        customise(&mut c);
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        email_server,
        store_server,
        api_client,
    }
}
