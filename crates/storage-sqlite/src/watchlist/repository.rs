use finclue_core::alerts::{NewWatchlistEntry, WatchlistEntry, WatchlistRepositoryTrait};
use finclue_core::errors::{DatabaseError, Error};
use finclue_core::Result;

use super::model::WatchlistEntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::watchlist_entries;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

pub struct WatchlistRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl WatchlistRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        WatchlistRepository { pool, writer }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<WatchlistEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = watchlist_entries::table
            .filter(watchlist_entries::owner_id.eq(owner_id))
            .order(watchlist_entries::symbol.asc())
            .load::<WatchlistEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(WatchlistEntryDB::into_domain).collect()
    }

    async fn list_all(&self) -> Result<Vec<WatchlistEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = watchlist_entries::table
            .order((
                watchlist_entries::owner_id.asc(),
                watchlist_entries::symbol.asc(),
            ))
            .load::<WatchlistEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(WatchlistEntryDB::into_domain).collect()
    }

    async fn upsert_entry(&self, entry: NewWatchlistEntry) -> Result<WatchlistEntry> {
        let (symbol, threshold) = entry.validate()?;
        let owner_id = entry.owner_id;
        let reference_high = entry.reference_high;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<WatchlistEntry> {
                let row = WatchlistEntryDB {
                    id: Uuid::new_v4().to_string(),
                    owner_id: owner_id.clone(),
                    symbol: symbol.clone(),
                    dip_threshold_percent: threshold.to_string(),
                    reference_high: reference_high.map(|d| d.to_string()),
                    created_at: Utc::now().to_rfc3339(),
                };
                diesel::insert_into(watchlist_entries::table)
                    .values(&row)
                    .on_conflict((
                        watchlist_entries::owner_id,
                        watchlist_entries::symbol,
                    ))
                    .do_update()
                    .set((
                        watchlist_entries::dip_threshold_percent
                            .eq(&row.dip_threshold_percent),
                        watchlist_entries::reference_high.eq(&row.reference_high),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = watchlist_entries::table
                    .filter(watchlist_entries::owner_id.eq(&owner_id))
                    .filter(watchlist_entries::symbol.eq(&symbol))
                    .first::<WatchlistEntryDB>(conn)
                    .map_err(StorageError::from)?;
                stored.into_domain()
            })
            .await
    }

    async fn remove_entry(&self, owner_id: &str, symbol: &str) -> Result<()> {
        let owner = owner_id.to_string();
        let sym = symbol.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let deleted = diesel::delete(
                    watchlist_entries::table
                        .filter(watchlist_entries::owner_id.eq(&owner))
                        .filter(watchlist_entries::symbol.eq(&sym)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Watchlist entry {} for owner {}",
                        sym, owner
                    ))));
                }
                Ok(())
            })
            .await
    }
}
