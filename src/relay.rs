use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ContactSubmission, NotificationRecord};
use crate::email_client::{DeliveryError, EmailSender, Mailbox, OutgoingEmail};
use crate::record_store::{submission_key, RecordStore, StoredSubmission};

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("No email provider is configured")]
    ProviderUnconfigured,
    #[error("Failed to deliver the notification via {provider}")]
    Delivery {
        provider: &'static str,
        #[source]
        source: DeliveryError,
    },
}

/// Turns a validated submission into a notification for the site owner.
///
/// The backup write happens first and never affects the outcome. Delivery
/// of the notification is the only thing that decides success.
pub struct ContactRelay {
    sender: Option<Arc<dyn EmailSender>>,
    store: Option<Arc<dyn RecordStore>>,
    from: Mailbox,
    to: Mailbox,
    site_name: String,
}

impl ContactRelay {
    pub fn new(
        sender: Option<Arc<dyn EmailSender>>,
        store: Option<Arc<dyn RecordStore>>,
        from: Mailbox,
        to: Mailbox,
        site_name: String,
    ) -> Self {
        Self {
            sender,
            store,
            from,
            to,
            site_name,
        }
    }

    #[tracing::instrument(
        name = "Relay a contact submission",
        skip(self, submission),
        fields(
            submitter = %submission.email.redacted(),
            tier = %submission.tier.code(),
        )
    )]
    pub async fn relay(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let notification = NotificationRecord::new(submission, &self.site_name, Utc::now());

        if let Some(store) = &self.store {
            store_backup(store.as_ref(), submission, &notification).await;
        }

        let sender = self.sender.as_ref().ok_or(RelayError::ProviderUnconfigured)?;
        let email = OutgoingEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            reply_to: Mailbox::new(submission.email.clone(), Some(submission.name.clone())),
            subject: notification.subject,
            text_body: notification.body,
        };
        sender
            .send(&email)
            .await
            .map_err(|source| RelayError::Delivery {
                provider: sender.provider(),
                source,
            })
    }
}

#[tracing::instrument(name = "Store submission backup", skip_all)]
async fn store_backup(
    store: &dyn RecordStore,
    submission: &ContactSubmission,
    notification: &NotificationRecord,
) {
    let key = submission_key(notification.submitted_at);
    let stored = StoredSubmission::new(submission, notification.submitted_at_iso());
    let value = match serde_json::to_value(&stored) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error.cause_chain = ?e, "Failed to serialize submission backup");
            return;
        }
    };
    match store.put(&key, &value).await {
        Ok(()) => tracing::info!(key = %key, "Stored submission backup"),
        Err(e) => tracing::warn!(
            key = %key,
            error.cause_chain = ?e,
            "Failed to store submission backup, continuing with delivery"
        ),
    }
}
