use super::alerts_errors::AlertError;
use crate::constants::DEFAULT_DIP_THRESHOLD_PERCENT;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use finclue_market_data::validate_symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A ticker an owner watches for dip alerts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: String,
    pub owner_id: String,
    pub symbol: String,
    /// Dip percentage at or above which an alert fires. `(0, 100]`.
    pub dip_threshold_percent: Decimal,
    /// Pinned reference high. When absent, evaluation falls back to the
    /// quote's rolling 52-week high.
    pub reference_high: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or updating a watchlist entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlistEntry {
    pub owner_id: String,
    pub symbol: String,
    /// Defaults to 10 percent when omitted.
    pub dip_threshold_percent: Option<Decimal>,
    /// Optional pinned reference high, must be positive when given.
    pub reference_high: Option<Decimal>,
}

impl NewWatchlistEntry {
    /// Normalizes the symbol and resolves the threshold, rejecting thresholds
    /// outside `(0, 100]` and non-positive reference highs.
    pub fn validate(&self) -> Result<(String, Decimal)> {
        let symbol = validate_symbol(&self.symbol)?;
        let threshold = self
            .dip_threshold_percent
            .unwrap_or(DEFAULT_DIP_THRESHOLD_PERCENT);
        if threshold <= Decimal::ZERO || threshold > Decimal::ONE_HUNDRED {
            return Err(AlertError::InvalidThreshold(threshold.to_string()).into());
        }
        if let Some(high) = self.reference_high {
            if high <= Decimal::ZERO {
                return Err(AlertError::InvalidReferenceHigh(high.to_string()).into());
            }
        }
        Ok((symbol, threshold))
    }
}

/// One triggered dip: the watched symbol fell far enough below its 52-week
/// high to cross the owner's threshold.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DipAlert {
    pub owner_id: String,
    pub symbol: String,
    pub current_price: Decimal,
    pub reference_high: Decimal,
    /// How far below the reference high, in percent, rounded to 2 decimals.
    pub dip_percent: Decimal,
    pub threshold_percent: Decimal,
    pub evaluated_at: DateTime<Utc>,
}
