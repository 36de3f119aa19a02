//! Database model for the notification log.

use crate::utils::parse_timestamp;
use diesel::prelude::*;
use finclue_core::errors::{DatabaseError, Error};
use finclue_core::notifications::{AlertKind, NotificationLogEntry};
use serde::{Deserialize, Serialize};

/// Database model for notification log rows
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::notification_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationLogDB {
    pub id: String,
    pub owner_id: String,
    pub symbol: String,
    pub kind: String,
    pub day_bucket: String,
    pub sent_at: String,
}

impl NotificationLogDB {
    pub fn into_domain(self) -> Result<NotificationLogEntry, Error> {
        let kind = match self.kind.as_str() {
            "watchlist_dip" => AlertKind::WatchlistDip,
            other => {
                return Err(Error::Database(DatabaseError::Internal(format!(
                    "Unknown alert kind in notification_log.kind: {}",
                    other
                ))))
            }
        };
        Ok(NotificationLogEntry {
            sent_at: parse_timestamp(&self.sent_at, "notification_log.sent_at")?,
            id: self.id,
            owner_id: self.owner_id,
            symbol: self.symbol,
            kind,
        })
    }
}
