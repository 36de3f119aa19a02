//! Database models for portfolios and holdings.
//!
//! Decimal columns are stored as text to avoid float drift; conversion to
//! `rust_decimal::Decimal` happens at this boundary.

use crate::utils::parse_decimal;
use diesel::prelude::*;
use finclue_core::errors::Error;
use finclue_core::portfolio::Holding;
use serde::{Deserialize, Serialize};

/// Database model for portfolios
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDB {
    pub id: String,
    pub owner_id: String,
    pub cash: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for holdings
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, Associations, PartialEq,
    Serialize, Deserialize, Debug, Clone,
)]
#[diesel(belongs_to(PortfolioDB, foreign_key = portfolio_id))]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HoldingDB {
    pub id: String,
    pub portfolio_id: String,
    pub symbol: String,
    pub quantity: String,
    pub cost_basis: String,
    pub created_at: String,
    pub updated_at: String,
}

impl HoldingDB {
    pub fn into_domain(self) -> Result<Holding, Error> {
        Ok(Holding {
            symbol: self.symbol,
            quantity: parse_decimal(&self.quantity, "holdings.quantity")?,
            cost_basis: parse_decimal(&self.cost_basis, "holdings.cost_basis")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_holding_conversion_parses_decimals() {
        let db = HoldingDB {
            id: "h1".to_string(),
            portfolio_id: "p1".to_string(),
            symbol: "AAPL".to_string(),
            quantity: "10.5".to_string(),
            cost_basis: "1500.25".to_string(),
            created_at: "2025-04-01T00:00:00Z".to_string(),
            updated_at: "2025-04-01T00:00:00Z".to_string(),
        };
        let holding = db.into_domain().unwrap();
        assert_eq!(holding.quantity, dec!(10.5));
        assert_eq!(holding.cost_basis, dec!(1500.25));
    }

    #[test]
    fn test_corrupt_decimal_is_an_error() {
        let mut db = HoldingDB {
            id: "h1".to_string(),
            portfolio_id: "p1".to_string(),
            symbol: "AAPL".to_string(),
            quantity: "ten".to_string(),
            cost_basis: "0".to_string(),
            created_at: "2025-04-01T00:00:00Z".to_string(),
            updated_at: "2025-04-01T00:00:00Z".to_string(),
        };
        assert!(db.clone().into_domain().is_err());
        db.quantity = "10".to_string();
        assert!(db.into_domain().is_ok());
    }
}
