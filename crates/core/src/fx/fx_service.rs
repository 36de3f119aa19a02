use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, RateSnapshot};
use super::fx_traits::FxServiceTrait;
use crate::constants::FX_CACHE_TTL_SECS;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use finclue_market_data::{MarketDataError, QuoteProvider};
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// TTL-cached exchange rate lookup.
///
/// The cache is a process-wide, in-memory map guarded by an `RwLock`; a race
/// between two concurrent refreshes is last-write-wins and harmless since
/// both writes hold a valid rate. Nothing is persisted across restarts.
pub struct FxService {
    provider: Arc<dyn QuoteProvider>,
    cache: RwLock<HashMap<String, ExchangeRate>>,
    ttl: Duration,
}

impl FxService {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_ttl(provider, Duration::seconds(FX_CACHE_TTL_SECS as i64))
    }

    pub fn with_ttl(provider: Arc<dyn QuoteProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn normalize_code(code: &str) -> std::result::Result<String, FxError> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(trimmed.to_uppercase())
    }

    fn cached(&self, base: &str, quote: &str) -> Result<Option<ExchangeRate>> {
        let cache = self
            .cache
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        Ok(cache.get(&ExchangeRate::pair_key(base, quote)).cloned())
    }

    fn store(&self, rate: &ExchangeRate) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        // Cache both directions so an EUR/USD fetch also serves USD/EUR.
        let inverse = rate.inverted();
        cache.insert(ExchangeRate::pair_key(&rate.base, &rate.quote), rate.clone());
        cache.insert(ExchangeRate::pair_key(&inverse.base, &inverse.quote), inverse);
        Ok(())
    }

    fn is_fresh(&self, rate: &ExchangeRate) -> bool {
        Utc::now() - rate.fetched_at <= self.ttl
    }

    /// One upstream fetch for the pair. FMP serves the canonical direction
    /// (e.g. EURUSD); when the requested direction is unknown upstream, the
    /// inverse pair is fetched and inverted, never converted twice.
    async fn fetch_pair(&self, base: &str, quote: &str) -> Result<ExchangeRate> {
        let direct = format!("{}{}", base, quote);
        let first_err: MarketDataError = match self.provider.get_fx_quote(&direct).await {
            Ok(rate) => {
                return Self::build_rate(base, quote, rate);
            }
            Err(e) => e,
        };

        let inverse = format!("{}{}", quote, base);
        match self.provider.get_fx_quote(&inverse).await {
            Ok(rate) => Ok(Self::build_rate(quote, base, rate)?.inverted()),
            Err(_) => Err(FxError::RateUnavailable {
                base: base.to_string(),
                quote: quote.to_string(),
                message: first_err.to_string(),
            }
            .into()),
        }
    }

    fn build_rate(base: &str, quote: &str, rate: Decimal) -> Result<ExchangeRate> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!("{}/{} = {}", base, quote, rate)).into());
        }
        Ok(ExchangeRate {
            base: base.to_string(),
            quote: quote.to_string(),
            rate,
            fetched_at: Utc::now(),
        })
    }

    fn snapshot(rate: &ExchangeRate, stale: bool) -> RateSnapshot {
        RateSnapshot {
            rate: rate.rate,
            fetched_at: rate.fetched_at,
            stale,
        }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_rate(&self, from: &str, to: &str) -> Result<RateSnapshot> {
        let base = Self::normalize_code(from)?;
        let quote = Self::normalize_code(to)?;

        if base == quote {
            return Ok(RateSnapshot {
                rate: Decimal::ONE,
                fetched_at: Utc::now(),
                stale: false,
            });
        }

        if let Some(cached) = self.cached(&base, &quote)? {
            if self.is_fresh(&cached) {
                return Ok(Self::snapshot(&cached, false));
            }
        }

        match self.fetch_pair(&base, &quote).await {
            Ok(rate) => {
                self.store(&rate)?;
                Ok(Self::snapshot(&rate, false))
            }
            Err(err) => {
                // A stale rate is still real data; serve it flagged rather
                // than substituting a guessed constant.
                if let Some(cached) = self.cached(&base, &quote)? {
                    warn!(
                        "FX fetch for {}/{} failed ({}), serving stale rate from {}",
                        base, quote, err, cached.fetched_at
                    );
                    return Ok(Self::snapshot(&cached, true));
                }
                Err(err)
            }
        }
    }

    async fn refresh(&self, from: &str, to: &str) -> Result<RateSnapshot> {
        let base = Self::normalize_code(from)?;
        let quote = Self::normalize_code(to)?;

        if base == quote {
            return Ok(RateSnapshot {
                rate: Decimal::ONE,
                fetched_at: Utc::now(),
                stale: false,
            });
        }

        let rate = self.fetch_pair(&base, &quote).await?;
        self.store(&rate)?;
        Ok(Self::snapshot(&rate, false))
    }

    fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use finclue_market_data::Quote;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider stub with a scripted FX answer and a fetch counter.
    struct StubProvider {
        fetches: AtomicUsize,
        // pair -> rate; pairs not present fail like an upstream 500
        rates: Mutex<HashMap<String, Decimal>>,
    }

    impl StubProvider {
        fn with_rate(pair: &str, rate: Decimal) -> Self {
            let mut rates = HashMap::new();
            rates.insert(pair.to_string(), rate);
            Self {
                fetches: AtomicUsize::new(0),
                rates: Mutex::new(rates),
            }
        }

        fn failing() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                rates: Mutex::new(HashMap::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        fn fail_from_now_on(&self) {
            self.rates.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        fn id(&self) -> &'static str {
            "STUB"
        }

        async fn get_quotes(
            &self,
            _symbols: &[String],
        ) -> std::result::Result<HashMap<String, Quote>, MarketDataError> {
            Ok(HashMap::new())
        }

        async fn get_fx_quote(&self, pair: &str) -> std::result::Result<Decimal, MarketDataError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.rates
                .lock()
                .unwrap()
                .get(pair)
                .copied()
                .ok_or_else(|| MarketDataError::ProviderError {
                    provider: "STUB".to_string(),
                    status: 500,
                    message: "Internal server error".to_string(),
                })
        }
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl_fetches_once() {
        let provider = Arc::new(StubProvider::with_rate("USDEUR", dec!(0.92)));
        let service = FxService::new(provider.clone());

        let first = service.get_rate("USD", "EUR").await.unwrap();
        let second = service.get_rate("USD", "EUR").await.unwrap();

        assert_eq!(first.rate, dec!(0.92));
        assert_eq!(first.rate, second.rate);
        assert!(!second.stale);
        assert_eq!(provider.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_inverse_pair_fallback() {
        // Upstream only knows EURUSD; a USD->EUR request must invert it.
        let provider = Arc::new(StubProvider::with_rate("EURUSD", dec!(1.25)));
        let service = FxService::new(provider);

        let snapshot = service.get_rate("USD", "EUR").await.unwrap();
        assert_eq!(snapshot.rate, dec!(0.8));
    }

    #[tokio::test]
    async fn test_failure_with_no_cache_is_rate_unavailable() {
        let provider = Arc::new(StubProvider::failing());
        let service = FxService::new(provider);

        let err = service.get_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, Error::Fx(FxError::RateUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_failure_with_stale_cache_serves_flagged_rate() {
        let provider = Arc::new(StubProvider::with_rate("USDEUR", dec!(0.92)));
        // Zero TTL: every cached value is immediately stale.
        let service = FxService::with_ttl(provider.clone(), Duration::seconds(-1));

        service.get_rate("USD", "EUR").await.unwrap();
        provider.fail_from_now_on();

        let snapshot = service.get_rate("USD", "EUR").await.unwrap();
        assert_eq!(snapshot.rate, dec!(0.92));
        assert!(snapshot.stale);
    }

    #[tokio::test]
    async fn test_same_currency_short_circuits() {
        let provider = Arc::new(StubProvider::failing());
        let service = FxService::new(provider.clone());

        let snapshot = service.get_rate("EUR", "EUR").await.unwrap();
        assert_eq!(snapshot.rate, Decimal::ONE);
        assert_eq!(provider.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_currency_code_rejected() {
        let provider = Arc::new(StubProvider::failing());
        let service = FxService::new(provider);

        assert!(service.get_rate("EURO", "USD").await.is_err());
        assert!(service.get_rate("E1R", "USD").await.is_err());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let provider = Arc::new(StubProvider::with_rate("USDEUR", dec!(0.92)));
        let service = FxService::new(provider.clone());

        service.get_rate("USD", "EUR").await.unwrap();
        service.invalidate();
        service.get_rate("USD", "EUR").await.unwrap();

        assert_eq!(provider.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let provider = Arc::new(StubProvider::with_rate("USDEUR", dec!(0.92)));
        let service = FxService::new(provider.clone());

        service.get_rate("USD", "EUR").await.unwrap();
        service.refresh("USD", "EUR").await.unwrap();

        assert_eq!(provider.fetch_count(), 2);
    }
}
