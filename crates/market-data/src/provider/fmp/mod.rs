//! Financial Modeling Prep (FMP) provider implementation.
//!
//! # API Endpoints
//!
//! - Batch quotes: `https://financialmodelingprep.com/api/v3/quote/{SYM1,SYM2}?apikey=...`
//! - FX pair: `https://financialmodelingprep.com/api/v3/fx/{PAIR}?apikey=...`
//!
//! Quotes are batched comma-joined into a single request, chunked at
//! [`QUOTE_BATCH_SIZE`] symbols to respect URL-length and provider limits.
//! The FX endpoint has been observed returning both an array and a bare
//! object, with the rate under varying field names; parsing takes the first
//! usable of `ask`, `bid`, `open`, `price`, `close`.

mod models;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::{debug, warn};
use rand::Rng;
use reqwest::Client;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::{MarketDataError, RetryClass};
use crate::models::Quote;
use crate::provider::QuoteProvider;
use crate::symbol::validate_symbols;
use crate::throttle::Throttle;

use models::{FmpFxQuote, FmpQuote};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_ID: &str = "FMP";

/// Maximum symbols per batched quote request.
pub const QUOTE_BATCH_SIZE: usize = 20;

/// Per-call HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Base delay before the single retry; a random jitter of up to the same
/// amount is added on top.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// FMP provider for fetching equity quotes and FX rates.
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
    throttle: Throttle,
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a provider pointed at an alternate base URL (test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url,
            throttle: Throttle::new(),
        }
    }

    /// Issue one GET request and map transport/status failures.
    async fn fetch_once(&self, url: &str) -> Result<String, MarketDataError> {
        let response = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                message: format!("HTTP error: {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(MarketDataError::Network)
    }

    /// Fetch with the single-retry policy: transient failures get one more
    /// attempt after a jittered delay, everything else fails immediately.
    async fn fetch(&self, url: &str) -> Result<String, MarketDataError> {
        self.throttle.acquire().await;

        match self.fetch_once(url).await {
            Ok(body) => Ok(body),
            Err(err) if err.retry_class() == RetryClass::WithBackoff => {
                let jitter = rand::thread_rng().gen_range(0..RETRY_BASE_DELAY.as_millis() as u64);
                let delay = RETRY_BASE_DELAY + Duration::from_millis(jitter);
                warn!("FMP request failed ({}), retrying once in {:?}", err, delay);
                tokio::time::sleep(delay).await;
                self.throttle.acquire().await;
                self.fetch_once(url).await
            }
            Err(err) => Err(err),
        }
    }

    fn parse_quote(raw: FmpQuote) -> Option<Quote> {
        let price = Decimal::from_f64_retain(raw.price)?;
        if price.is_sign_negative() {
            warn!("Skipping quote for {}: negative price {}", raw.symbol, raw.price);
            return None;
        }

        let as_of = raw
            .timestamp
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Some(Quote {
            symbol: raw.symbol,
            price,
            change_percent: raw.changes_percentage.and_then(Decimal::from_f64_retain),
            year_high: raw.year_high.and_then(Decimal::from_f64_retain),
            year_low: raw.year_low.and_then(Decimal::from_f64_retain),
            currency: "USD".to_string(),
            as_of,
            source: PROVIDER_ID.to_string(),
        })
    }

    async fn fetch_quote_chunk(
        &self,
        symbols: &[String],
    ) -> Result<Vec<Quote>, MarketDataError> {
        let joined = symbols.join(",");
        let url = format!("{}/quote/{}", self.base_url, joined);

        let body = self.fetch(&url).await?;
        let raw_quotes: Vec<FmpQuote> =
            serde_json::from_str(&body).map_err(|e| MarketDataError::ValidationFailed {
                message: format!("Failed to parse quote response: {}", e),
            })?;

        Ok(raw_quotes.into_iter().filter_map(Self::parse_quote).collect())
    }
}

#[async_trait]
impl QuoteProvider for FmpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_quotes(
        &self,
        symbols: &[String],
    ) -> Result<HashMap<String, Quote>, MarketDataError> {
        let validated = validate_symbols(symbols)?;
        if validated.is_empty() {
            return Ok(HashMap::new());
        }

        let mut quotes = HashMap::with_capacity(validated.len());
        for chunk in validated.chunks(QUOTE_BATCH_SIZE) {
            debug!("Fetching quote batch of {} symbols", chunk.len());
            for quote in self.fetch_quote_chunk(chunk).await? {
                quotes.insert(quote.symbol.clone(), quote);
            }
        }

        Ok(quotes)
    }

    async fn get_fx_quote(&self, pair: &str) -> Result<Decimal, MarketDataError> {
        let url = format!("{}/fx/{}", self.base_url, pair);
        let body = self.fetch(&url).await?;

        // The endpoint returns either `[{...}]` or a bare `{...}`.
        let raw: FmpFxQuote = serde_json::from_str::<Vec<FmpFxQuote>>(&body)
            .ok()
            .and_then(|mut v| if v.is_empty() { None } else { Some(v.remove(0)) })
            .or_else(|| serde_json::from_str(&body).ok())
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Failed to parse FX response for {}", pair),
            })?;

        let rate = raw
            .first_usable_rate()
            .and_then(Decimal::from_f64_retain)
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("No usable rate in FX response for {}", pair),
            })?;

        if rate <= Decimal::ZERO {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-positive FX rate {} for {}", rate, pair),
            });
        }

        Ok(rate)
    }
}
