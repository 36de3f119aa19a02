//! Wire models for FMP responses.

use serde::Deserialize;

/// One entry of the batch quote response.
#[derive(Debug, Deserialize)]
pub(super) struct FmpQuote {
    pub symbol: String,
    pub price: f64,
    #[serde(rename = "changesPercentage", default)]
    pub changes_percentage: Option<f64>,
    #[serde(rename = "yearHigh", default)]
    pub year_high: Option<f64>,
    #[serde(rename = "yearLow", default)]
    pub year_low: Option<f64>,
    /// Unix timestamp of the quote, when the endpoint provides one.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// FX pair response entry. Field names vary between API versions, so every
/// candidate is optional.
#[derive(Debug, Deserialize)]
pub(super) struct FmpFxQuote {
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
}

impl FmpFxQuote {
    /// First usable positive rate, in the order the source application
    /// probed the fields.
    pub(super) fn first_usable_rate(&self) -> Option<f64> {
        [self.ask, self.bid, self.open, self.price, self.close]
            .into_iter()
            .flatten()
            .find(|v| v.is_finite() && *v > 0.0)
    }
}
