//! Notification dispatch - dedup log, email rendering, and the Resend mailer.

mod email;
mod notifications_errors;
mod notifications_model;
mod notifications_service;
mod notifications_traits;
mod resend;

pub use email::render_dip_digest;
pub use notifications_errors::NotificationError;
pub use notifications_model::{
    AlertKind, AlertRecipient, DispatchSummary, EmailMessage, NotificationLogEntry, RecordOutcome,
};
pub use notifications_service::NotificationService;
pub use resend::ResendMailer;
pub use notifications_traits::{
    Mailer, NotificationLogRepositoryTrait, RecipientRepositoryTrait,
};
