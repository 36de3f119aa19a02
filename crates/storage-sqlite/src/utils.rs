//! Parsing helpers shared by the database models.
//!
//! Decimals and timestamps are stored as text; corruption in those columns
//! surfaces as an internal database error, never a panic.

use chrono::{DateTime, Utc};
use finclue_core::errors::{DatabaseError, Error};
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) fn parse_decimal(raw: &str, column: &str) -> Result<Decimal, Error> {
    Decimal::from_str(raw).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "Corrupt decimal in column {}: {}",
            column, e
        )))
    })
}

pub(crate) fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "Corrupt timestamp in column {}: {}",
                column, e
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("10.5", "c").unwrap(), dec!(10.5));
        assert!(parse_decimal("not-a-number", "c").is_err());
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2025-04-01T00:00:00Z", "c").is_ok());
        assert!(parse_timestamp("yesterday", "c").is_err());
    }
}
