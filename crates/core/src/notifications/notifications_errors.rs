use thiserror::Error;

/// Errors raised while dispatching notifications.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// The mail provider rejected or failed the send.
    #[error("Mailer request failed with status {status}: {message}")]
    Mailer { status: u16, message: String },

    /// Could not reach the mail provider at all.
    #[error("Mailer unreachable: {0}")]
    MailerUnreachable(String),

    /// No delivery address is configured for the owner.
    #[error("No recipient address for owner {0}")]
    MissingRecipient(String),

    #[error("Failed to render notification: {0}")]
    RenderFailed(String),
}
