use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::ContactSubmission;

pub const PHONE_PLACEHOLDER: &str = "Not provided";

/// The plain-text notification sent to the site owner.
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub subject: String,
    pub body: String,
    pub submitted_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(
        submission: &ContactSubmission,
        site_name: &str,
        submitted_at: DateTime<Utc>,
    ) -> NotificationRecord {
        let subject = format!("New GEO Inquiry from {}", submission.name);
        let body = format!(
            "New GEO inquiry from {site}\n\
             \n\
             Name: {name}\n\
             Email: {email}\n\
             Business/Website: {business}\n\
             Phone: {phone}\n\
             Interested In: {tier}\n\
             \n\
             Message:\n\
             {message}\n\
             \n\
             ---\n\
             Submitted at: {submitted_at}",
            site = site_name,
            name = submission.name,
            email = submission.email,
            business = submission.business,
            phone = submission.phone.as_deref().unwrap_or(PHONE_PLACEHOLDER),
            tier = submission.tier.label(),
            message = submission.message,
            submitted_at = iso_timestamp(&submitted_at),
        );
        Self {
            subject,
            body,
            submitted_at,
        }
    }

    pub fn submitted_at_iso(&self) -> String {
        iso_timestamp(&self.submitted_at)
    }
}

fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
