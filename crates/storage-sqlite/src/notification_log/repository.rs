use finclue_core::errors::Error;
use finclue_core::notifications::{
    AlertKind, NotificationLogEntry, NotificationLogRepositoryTrait, RecordOutcome,
};
use finclue_core::Result;

use super::model::NotificationLogDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::notification_log;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

pub struct NotificationLogRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl NotificationLogRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        NotificationLogRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationLogRepositoryTrait for NotificationLogRepository {
    async fn was_sent_within(
        &self,
        owner_id: &str,
        symbol: &str,
        kind: AlertKind,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count = notification_log::table
            .filter(notification_log::owner_id.eq(owner_id))
            .filter(notification_log::symbol.eq(symbol))
            .filter(notification_log::kind.eq(kind.as_str()))
            .filter(notification_log::sent_at.ge(since.to_rfc3339()))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    async fn try_record_sent(
        &self,
        owner_id: &str,
        symbol: &str,
        kind: AlertKind,
        sent_at: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let row = NotificationLogDB {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            symbol: symbol.to_string(),
            kind: kind.as_str().to_string(),
            day_bucket: sent_at.format("%Y-%m-%d").to_string(),
            sent_at: sent_at.to_rfc3339(),
        };
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RecordOutcome> {
                // The unique index on (owner, symbol, kind, day) is the
                // arbiter; losing the race is a normal outcome, not an error.
                let inserted = diesel::insert_into(notification_log::table)
                    .values(&row)
                    .on_conflict((
                        notification_log::owner_id,
                        notification_log::symbol,
                        notification_log::kind,
                        notification_log::day_bucket,
                    ))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if inserted == 0 {
                    Ok(RecordOutcome::AlreadyRecorded)
                } else {
                    Ok(RecordOutcome::Recorded)
                }
            })
            .await
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<NotificationLogEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notification_log::table
            .filter(notification_log::owner_id.eq(owner_id))
            .order(notification_log::sent_at.desc())
            .load::<NotificationLogDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(NotificationLogDB::into_domain).collect()
    }

    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    notification_log::table
                        .filter(notification_log::sent_at.lt(cutoff.to_rfc3339())),
                )
                .execute(conn)
                .map_err(StorageError::from)
                .map_err(Error::from)
            })
            .await
    }
}
