//! Database model for watchlist entries.

use crate::utils::{parse_decimal, parse_timestamp};
use diesel::prelude::*;
use finclue_core::alerts::WatchlistEntry;
use finclue_core::errors::Error;
use serde::{Deserialize, Serialize};

/// Database model for watchlist entries
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::watchlist_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntryDB {
    pub id: String,
    pub owner_id: String,
    pub symbol: String,
    pub dip_threshold_percent: String,
    pub reference_high: Option<String>,
    pub created_at: String,
}

impl WatchlistEntryDB {
    pub fn into_domain(self) -> Result<WatchlistEntry, Error> {
        let created_at = parse_timestamp(&self.created_at, "watchlist_entries.created_at")?;
        let reference_high = self
            .reference_high
            .as_deref()
            .map(|raw| parse_decimal(raw, "watchlist_entries.reference_high"))
            .transpose()?;
        Ok(WatchlistEntry {
            dip_threshold_percent: parse_decimal(
                &self.dip_threshold_percent,
                "watchlist_entries.dip_threshold_percent",
            )?,
            id: self.id,
            owner_id: self.owner_id,
            symbol: self.symbol,
            reference_high,
            created_at,
        })
    }
}
