use super::alerts_model::{DipAlert, WatchlistEntry};
use super::alerts_traits::{AlertServiceTrait, WatchlistRepositoryTrait};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::Utc;
use finclue_market_data::{Quote, QuoteProvider};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Evaluates watchlist entries against live quotes.
///
/// The dip measure is distance below the 52-week high:
/// `dip = (yearHigh - price) / yearHigh * 100`. An alert fires when the dip
/// is at or above the entry's threshold; a price exactly at the threshold
/// triggers.
pub struct AlertService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    quote_provider: Arc<dyn QuoteProvider>,
}

impl AlertService {
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        quote_provider: Arc<dyn QuoteProvider>,
    ) -> Self {
        Self {
            repository,
            quote_provider,
        }
    }

    async fn evaluate_entries(&self, entries: Vec<WatchlistEntry>) -> Result<Vec<DipAlert>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut symbols: Vec<String> = entries.iter().map(|e| e.symbol.clone()).collect();
        symbols.sort();
        symbols.dedup();

        let quotes = self.quote_provider.get_quotes(&symbols).await?;
        let mut alerts: Vec<DipAlert> = entries
            .iter()
            .filter_map(|entry| evaluate_entry(entry, &quotes))
            .collect();

        // Deepest dip first so the worst movers lead the report.
        alerts.sort_by(|a, b| b.dip_percent.cmp(&a.dip_percent));
        debug!(
            "Evaluated {} watchlist entries, {} dips triggered",
            entries.len(),
            alerts.len()
        );
        Ok(alerts)
    }
}

/// Distance below the reference high, in percent, rounded to two decimals.
///
/// Callers must ensure `reference_high > 0`.
pub fn dip_percent(reference_high: Decimal, price: Decimal) -> Decimal {
    ((reference_high - price) / reference_high * Decimal::ONE_HUNDRED).round_dp(2)
}

fn evaluate_entry(entry: &WatchlistEntry, quotes: &HashMap<String, Quote>) -> Option<DipAlert> {
    let quote = match quotes.get(&entry.symbol) {
        Some(quote) => quote,
        None => {
            warn!("No quote for watched symbol {}, skipping", entry.symbol);
            return None;
        }
    };

    // A pinned reference high on the entry wins over the quote's rolling
    // 52-week high.
    let reference_high = match entry.reference_high.or(quote.year_high) {
        Some(high) if high > Decimal::ZERO => high,
        _ => {
            warn!(
                "Symbol {} has no usable reference high, skipping dip evaluation",
                entry.symbol
            );
            return None;
        }
    };

    let dip_percent = dip_percent(reference_high, quote.price);
    if dip_percent < entry.dip_threshold_percent {
        return None;
    }

    Some(DipAlert {
        owner_id: entry.owner_id.clone(),
        symbol: entry.symbol.clone(),
        current_price: quote.price,
        reference_high,
        dip_percent,
        threshold_percent: entry.dip_threshold_percent,
        evaluated_at: Utc::now(),
    })
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    async fn evaluate_for_owner(&self, owner_id: &str) -> Result<Vec<DipAlert>> {
        let entries = self.repository.list_for_owner(owner_id).await?;
        self.evaluate_entries(entries).await
    }

    async fn evaluate_all(&self) -> Result<Vec<DipAlert>> {
        let entries = self.repository.list_all().await?;
        self.evaluate_entries(entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::NewWatchlistEntry;
    use finclue_market_data::MarketDataError;
    use rust_decimal_macros::dec;

    struct StubWatchlist {
        entries: Vec<WatchlistEntry>,
    }

    #[async_trait]
    impl WatchlistRepositoryTrait for StubWatchlist {
        async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<WatchlistEntry>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| e.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<WatchlistEntry>> {
            Ok(self.entries.clone())
        }

        async fn upsert_entry(&self, _entry: NewWatchlistEntry) -> Result<WatchlistEntry> {
            unimplemented!()
        }

        async fn remove_entry(&self, _owner_id: &str, _symbol: &str) -> Result<()> {
            unimplemented!()
        }
    }

    struct StubQuotes {
        quotes: HashMap<String, Quote>,
    }

    impl StubQuotes {
        fn new(entries: &[(&str, Decimal, Option<Decimal>)]) -> Self {
            let quotes = entries
                .iter()
                .map(|(symbol, price, year_high)| {
                    let mut quote = Quote::new(*symbol, *price, "USD", "STUB");
                    quote.year_high = *year_high;
                    ((*symbol).to_string(), quote)
                })
                .collect();
            Self { quotes }
        }
    }

    #[async_trait]
    impl QuoteProvider for StubQuotes {
        fn id(&self) -> &'static str {
            "STUB"
        }

        async fn get_quotes(
            &self,
            symbols: &[String],
        ) -> std::result::Result<HashMap<String, Quote>, MarketDataError> {
            Ok(symbols
                .iter()
                .filter_map(|s| self.quotes.get(s).map(|q| (s.clone(), q.clone())))
                .collect())
        }

        async fn get_fx_quote(&self, _pair: &str) -> std::result::Result<Decimal, MarketDataError> {
            Err(MarketDataError::ValidationFailed {
                message: "not used".to_string(),
            })
        }
    }

    fn watch(owner: &str, symbol: &str, threshold: Decimal) -> WatchlistEntry {
        WatchlistEntry {
            id: format!("{}-{}", owner, symbol),
            owner_id: owner.to_string(),
            symbol: symbol.to_string(),
            dip_threshold_percent: threshold,
            reference_high: None,
            created_at: Utc::now(),
        }
    }

    fn service(entries: Vec<WatchlistEntry>, quotes: StubQuotes) -> AlertService {
        AlertService::new(Arc::new(StubWatchlist { entries }), Arc::new(quotes))
    }

    #[tokio::test]
    async fn test_dip_at_threshold_triggers() {
        // high 213.45, price 180.50 -> dip 15.44% against a 15.44% threshold
        let svc = service(
            vec![watch("u1", "AAPL", dec!(15.44))],
            StubQuotes::new(&[("AAPL", dec!(180.50), Some(dec!(213.45)))]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].dip_percent, dec!(15.44));
        assert_eq!(alerts[0].reference_high, dec!(213.45));
    }

    #[tokio::test]
    async fn test_dip_below_threshold_is_silent() {
        let svc = service(
            vec![watch("u1", "AAPL", dec!(15.45))],
            StubQuotes::new(&[("AAPL", dec!(180.50), Some(dec!(213.45)))]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_price_at_high_never_triggers() {
        let svc = service(
            vec![watch("u1", "AAPL", dec!(0.01))],
            StubQuotes::new(&[("AAPL", dec!(200), Some(dec!(200)))]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_pinned_reference_high_overrides_quote() {
        let mut entry = watch("u1", "AAPL", dec!(10));
        entry.reference_high = Some(dec!(250));
        let svc = service(
            vec![entry],
            StubQuotes::new(&[("AAPL", dec!(200), Some(dec!(205)))]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        // Against the quote's high the dip is 2.44%; against the pinned 250
        // it is 20%.
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].dip_percent, dec!(20.00));
        assert_eq!(alerts[0].reference_high, dec!(250));
    }

    #[tokio::test]
    async fn test_missing_year_high_is_skipped() {
        let svc = service(
            vec![
                watch("u1", "NOHI", dec!(10)),
                watch("u1", "AAPL", dec!(10)),
            ],
            StubQuotes::new(&[
                ("NOHI", dec!(50), None),
                ("AAPL", dec!(150), Some(dec!(200))),
            ]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_alerts_sorted_deepest_first() {
        let svc = service(
            vec![
                watch("u1", "AAPL", dec!(5)),
                watch("u1", "MSFT", dec!(5)),
            ],
            StubQuotes::new(&[
                ("AAPL", dec!(190), Some(dec!(200))), // 5.00%
                ("MSFT", dec!(150), Some(dec!(200))), // 25.00%
            ]),
        );

        let alerts = svc.evaluate_for_owner("u1").await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].symbol, "MSFT");
        assert_eq!(alerts[1].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_evaluate_all_spans_owners() {
        let svc = service(
            vec![
                watch("u1", "AAPL", dec!(5)),
                watch("u2", "AAPL", dec!(3)),
            ],
            StubQuotes::new(&[("AAPL", dec!(190), Some(dec!(200)))]),
        );

        let alerts = svc.evaluate_all().await.unwrap();
        assert_eq!(alerts.len(), 2);
    }
}
