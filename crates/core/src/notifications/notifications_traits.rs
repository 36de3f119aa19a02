use super::notifications_model::{
    AlertKind, AlertRecipient, EmailMessage, NotificationLogEntry, RecordOutcome,
};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait defining the notification dedup log.
///
/// The log is the only thing standing between an owner and a duplicate email,
/// so claiming a slot must be atomic: implementations back `try_record_sent`
/// with a unique constraint, not a read-then-write.
#[async_trait]
pub trait NotificationLogRepositoryTrait: Send + Sync {
    /// True when a matching alert was already sent after `since`.
    async fn was_sent_within(
        &self,
        owner_id: &str,
        symbol: &str,
        kind: AlertKind,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// Atomically claim the dedup slot for this owner, symbol, kind, and day.
    async fn try_record_sent(
        &self,
        owner_id: &str,
        symbol: &str,
        kind: AlertKind,
        sent_at: DateTime<Utc>,
    ) -> Result<RecordOutcome>;

    /// Recent log rows for an owner, newest first.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<NotificationLogEntry>>;

    /// Delete rows older than the cutoff, returning the count removed.
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

/// Trait for looking up where an owner's alerts should be delivered.
#[async_trait]
pub trait RecipientRepositoryTrait: Send + Sync {
    async fn get_for_owner(&self, owner_id: &str) -> Result<Option<AlertRecipient>>;
}

/// Trait for the outbound mail provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers the message, returning the provider's message id.
    async fn send(&self, message: &EmailMessage) -> Result<String>;
}
