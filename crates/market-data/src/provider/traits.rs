//! Market data provider trait definitions.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source. The
/// valuation and alerting services only depend on this trait, so tests can
/// substitute a mock provider.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "FMP".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quotes for a set of ticker symbols.
    ///
    /// Symbols must already be validated. The returned map contains one entry
    /// per symbol the upstream knows about; unknown symbols are simply absent
    /// and callers decide how to surface them.
    async fn get_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Quote>, MarketDataError>;

    /// Fetch the current rate for an FX pair.
    ///
    /// `pair` is the provider's concatenated notation, e.g. "EURUSD" meaning
    /// the price of 1 EUR in USD. The caller handles inversion.
    async fn get_fx_quote(&self, pair: &str) -> Result<Decimal, MarketDataError>;
}
