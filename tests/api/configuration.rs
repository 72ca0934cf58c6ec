use crate::helpers::test_configuration;
use contact_relay::startup::Application;
use wiremock::MockServer;

#[tokio::test]
async fn startup_fails_when_the_provider_credential_is_missing() {
    let email_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server, &store_server);
    configuration.email_client.api_key = None;

    assert!(Application::build(configuration).await.is_err());
}

#[tokio::test]
async fn startup_fails_for_sendgrid_without_an_explicit_recipient() {
    let email_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server, &store_server);
    configuration.email_client.provider = Some("sendgrid".to_string());
    configuration.email_client.recipient_email = None;

    assert!(Application::build(configuration).await.is_err());
}

#[tokio::test]
async fn startup_fails_for_an_invalid_sender_address() {
    let email_server = MockServer::start().await;
    let store_server = MockServer::start().await;
    let mut configuration = test_configuration(&email_server, &store_server);
    configuration.email_client.sender_email = "noreply".to_string();

    assert!(Application::build(configuration).await.is_err());
}
