use actix_web::body::BoxBody;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use std::fmt::Formatter;

use crate::domain::{ContactFormData, ContactSubmission, SubmissionError};
use crate::relay::{ContactRelay, RelayError};

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Failed to send email")]
    ProviderError(#[source] anyhow::Error),
    #[error("Email delivery is not configured")]
    ProviderUnconfigured,
    #[error("Failed to process form submission")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ContactError {
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::MissingField(_) => "missing_field",
            ContactError::InvalidEmail => "invalid_email",
            ContactError::ProviderError(_) => "provider_error",
            ContactError::ProviderUnconfigured => "provider_unconfigured",
            ContactError::UnexpectedError(_) => "internal_error",
        }
    }
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MissingField(_) | ContactError::InvalidEmail => StatusCode::BAD_REQUEST,
            ContactError::ProviderError(_)
            | ContactError::ProviderUnconfigured
            | ContactError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
            .json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }))
    }
}

impl From<SubmissionError> for ContactError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::MissingField(field) => ContactError::MissingField(field),
            SubmissionError::InvalidEmail => ContactError::InvalidEmail,
        }
    }
}

impl From<RelayError> for ContactError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::ProviderUnconfigured => ContactError::ProviderUnconfigured,
            e @ RelayError::Delivery { .. } => ContactError::ProviderError(e.into()),
        }
    }
}

#[tracing::instrument(name = "Handle a contact submission", skip(body, relay))]
pub async fn submit_contact(
    body: web::Bytes,
    relay: web::Data<ContactRelay>,
) -> Result<HttpResponse, ContactError> {
    let form: ContactFormData =
        serde_json::from_slice(&body).context("Failed to parse the contact form body")?;
    let submission = ContactSubmission::parse(form).map_err(|e| {
        tracing::info!(reason = %e, "Rejected contact submission");
        e
    })?;

    if let Err(e) = relay.relay(&submission).await {
        tracing::error!(error.cause_chain = ?e, "Failed to relay contact submission");
        return Err(e.into());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .json(serde_json::json!({
            "success": true,
            "message": "Form submitted successfully",
        })))
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
