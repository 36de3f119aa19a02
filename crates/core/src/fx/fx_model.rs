use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fetched exchange rate for one currency pair.
///
/// Invariant: `rate > 0`. Created on cache miss, considered stale after the
/// TTL, replaced by the next successful fetch.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Cache key for a pair, e.g. "USD/EUR".
    pub fn pair_key(base: &str, quote: &str) -> String {
        format!("{}/{}", base, quote)
    }

    /// The same rate seen from the other side of the pair.
    pub fn inverted(&self) -> ExchangeRate {
        ExchangeRate {
            base: self.quote.clone(),
            quote: self.base.clone(),
            rate: Decimal::ONE / self.rate,
            fetched_at: self.fetched_at,
        }
    }
}

/// What callers of `get_rate` receive: the rate plus enough metadata to
/// decide whether to trust it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub rate: Decimal,
    pub fetched_at: DateTime<Utc>,
    /// True when the rate is older than the TTL and is only being served
    /// because the upstream fetch failed. Callers must surface this.
    pub stale: bool,
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(6);
    serializer.serialize_str(&rounded.to_string())
}
