//! Database model for alert recipients.

use diesel::prelude::*;
use finclue_core::notifications::AlertRecipient;
use serde::{Deserialize, Serialize};

/// Database model for alert recipients
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::alert_recipients)]
#[diesel(primary_key(owner_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AlertRecipientDB {
    pub owner_id: String,
    pub email: String,
    pub created_at: String,
}

impl From<AlertRecipientDB> for AlertRecipient {
    fn from(db: AlertRecipientDB) -> Self {
        Self {
            owner_id: db.owner_id,
            email: db.email,
        }
    }
}
