//! Domain models produced by market data providers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time quote for a single ticker symbol.
///
/// Quotes are never mutated after creation; a newer quote for the same
/// symbol supersedes the older one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// Last traded price in the provider's native currency (USD for FMP).
    pub price: Decimal,
    /// Day change in percent, as reported by the provider.
    pub change_percent: Option<Decimal>,
    /// 52-week high. Reference value for dip calculations.
    pub year_high: Option<Decimal>,
    /// 52-week low.
    pub year_low: Option<Decimal>,
    /// ISO currency code the price is denominated in.
    pub currency: String,
    pub as_of: DateTime<Utc>,
    /// Provider identifier the quote came from.
    pub source: String,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: Decimal, currency: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_percent: None,
            year_high: None,
            year_low: None,
            currency: currency.into(),
            as_of: Utc::now(),
            source: source.into(),
        }
    }
}
