//! Ticker symbol validation.
//!
//! Symbols are validated before any network call: alphanumeric plus dot and
//! hyphen, at most 10 characters. This is the format FMP accepts for both
//! equities ("AAPL", "BRK-B") and international listings ("AIR.DE").

use crate::errors::MarketDataError;
use regex::Regex;
use std::sync::OnceLock;

fn symbol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.\-]{0,9}$").expect("valid regex"))
}

/// Validates a ticker symbol, returning it uppercased.
///
/// Rejects malformed input with [`MarketDataError::InvalidSymbol`] so that no
/// request is ever issued for garbage symbols.
pub fn validate_symbol(symbol: &str) -> Result<String, MarketDataError> {
    let trimmed = symbol.trim();
    if symbol_pattern().is_match(trimmed) {
        Ok(trimmed.to_uppercase())
    } else {
        Err(MarketDataError::InvalidSymbol(symbol.to_string()))
    }
}

/// Validates a whole batch, failing on the first malformed symbol.
pub fn validate_symbols(symbols: &[String]) -> Result<Vec<String>, MarketDataError> {
    symbols.iter().map(|s| validate_symbol(s)).collect()
}
