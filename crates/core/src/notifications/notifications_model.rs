use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator for notification log rows. Currently one kind exists; the
/// column is kept so future alert types dedup independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    WatchlistDip,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::WatchlistDip => "watchlist_dip",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the notification log: a single ticker alert delivered to a
/// single owner. Digest emails produce one row per ticker they contain.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogEntry {
    pub id: String,
    pub owner_id: String,
    pub symbol: String,
    pub kind: AlertKind,
    pub sent_at: DateTime<Utc>,
}

/// Result of attempting to claim a dedup slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The slot was free and is now claimed by this run.
    Recorded,
    /// Another run already claimed the slot for this window.
    AlreadyRecorded,
}

/// Tally of a single notification run.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    /// Ticker alerts delivered in this run.
    pub sent: usize,
    /// Ticker alerts suppressed by the cooldown window.
    pub skipped: usize,
    /// Owners whose digest could not be delivered.
    pub errors: usize,
}

/// A rendered email ready for the mail provider.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery address for an owner's alerts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecipient {
    pub owner_id: String,
    pub email: String,
}
