mod contact_email;
mod contact_submission;
mod notification;
mod tier;

pub use contact_email::ContactEmail;
pub use contact_submission::{ContactFormData, ContactSubmission, SubmissionError};
pub use notification::{NotificationRecord, PHONE_PLACEHOLDER};
pub use tier::Tier;
