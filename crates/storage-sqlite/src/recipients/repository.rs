use finclue_core::notifications::{AlertRecipient, RecipientRepositoryTrait};
use finclue_core::Result;

use super::model::AlertRecipientDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::alert_recipients;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

pub struct RecipientRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl RecipientRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        RecipientRepository { pool, writer }
    }

    /// Sets or replaces the delivery address for an owner.
    pub async fn upsert(&self, recipient: AlertRecipient) -> Result<AlertRecipient> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AlertRecipient> {
                let row = AlertRecipientDB {
                    owner_id: recipient.owner_id.clone(),
                    email: recipient.email.clone(),
                    created_at: Utc::now().to_rfc3339(),
                };
                diesel::insert_into(alert_recipients::table)
                    .values(&row)
                    .on_conflict(alert_recipients::owner_id)
                    .do_update()
                    .set(alert_recipients::email.eq(&row.email))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(recipient)
            })
            .await
    }
}

#[async_trait]
impl RecipientRepositoryTrait for RecipientRepository {
    async fn get_for_owner(&self, owner_id: &str) -> Result<Option<AlertRecipient>> {
        let mut conn = get_connection(&self.pool)?;
        let row = alert_recipients::table
            .find(owner_id)
            .first::<AlertRecipientDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(AlertRecipient::from))
    }
}
