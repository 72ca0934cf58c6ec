use crate::helpers::{spawn_app_with, valid_submission, OWNER_EMAIL};
use secrecy::Secret;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn sendgrid_deployments_deliver_through_mail_send() {
    let app = spawn_app_with(|c| {
        c.email_client.provider = Some("sendgrid".to_string());
        c.email_client.api_key = Some(Secret::new("sg-test-key".to_string()));
    })
    .await;

    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer sg-test-key"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&valid_submission()).await;

    assert_eq!(200, response.status().as_u16());
    let emails = app.sent_emails().await;
    let email = &emails[0];
    assert_eq!(email["personalizations"][0]["to"][0]["email"], OWNER_EMAIL);
    assert_eq!(
        email["personalizations"][0]["subject"],
        "New GEO Inquiry from Ursula Le Guin"
    );
    assert_eq!(email["reply_to"]["email"], "ursula@guin.com");
    assert_eq!(email["reply_to"]["name"], "Ursula Le Guin");
}

#[tokio::test]
async fn web3forms_deployments_fail_when_the_relay_reports_no_success() {
    let app = spawn_app_with(|c| {
        c.email_client.provider = Some("web3forms".to_string());
        c.email_client.api_key = Some(Secret::new("forms-access-key".to_string()));
    })
    .await;

    Mock::given(path("/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Invalid access key"
        })))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&valid_submission()).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "provider_error");
    assert!(!body.to_string().contains("Invalid access key"));
}

#[tokio::test]
async fn web3forms_deployments_succeed_when_the_relay_reports_success() {
    let app = spawn_app_with(|c| {
        c.email_client.provider = Some("web3forms".to_string());
        c.email_client.api_key = Some(Secret::new("forms-access-key".to_string()));
    })
    .await;

    Mock::given(path("/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true
        })))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_contact(&valid_submission()).await;

    assert_eq!(200, response.status().as_u16());
    let emails = app.sent_emails().await;
    assert_eq!(emails[0]["access_key"], "forms-access-key");
    assert_eq!(emails[0]["email"], "ursula@guin.com");
}
