use serde_json::Value;

use crate::domain::{ContactEmail, Tier};

/// The contact form exactly as the site posts it.
///
/// Fields are kept as raw JSON so that a `false` or `0` is reported as a
/// missing field rather than failing deserialization.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ContactFormData {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub business: Option<Value>,
    #[serde(default)]
    pub tier: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SubmissionError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
}

#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: ContactEmail,
    pub business: String,
    pub tier: Tier,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// Required fields are checked in form order and the first gap is reported.
    pub fn parse(form: ContactFormData) -> Result<ContactSubmission, SubmissionError> {
        let name = required("name", form.name)?;
        let email = required("email", form.email)?;
        let business = required("business", form.business)?;
        let tier = required("tier", form.tier)?;
        let message = required("message", form.message)?;

        let email = ContactEmail::parse(email).map_err(|_| SubmissionError::InvalidEmail)?;
        let phone = text(form.phone);

        Ok(Self {
            name,
            email,
            business,
            tier: Tier::parse(tier),
            phone,
            message,
        })
    }
}

fn required(field: &'static str, value: Option<Value>) -> Result<String, SubmissionError> {
    text(value).ok_or(SubmissionError::MissingField(field))
}

/// `None` for absent, `null`, `false`, numeric zero and blank strings.
/// Any other value is rendered as text.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
