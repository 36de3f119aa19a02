//! Shared constants for the valuation and alerting pipeline.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency all user-facing values are reported in.
pub const REPORTING_CURRENCY: &str = "EUR";

/// Currency the market data provider quotes prices in.
pub const QUOTE_CURRENCY: &str = "USD";

/// How long a fetched exchange rate stays fresh.
pub const FX_CACHE_TTL_SECS: u64 = 5 * 60;

/// Default dip threshold for new watchlist entries, in percent.
pub const DEFAULT_DIP_THRESHOLD_PERCENT: Decimal = dec!(10);

/// Cooldown window for repeat notifications per (owner, symbol, kind).
pub const NOTIFICATION_COOLDOWN_HOURS: i64 = 24;

/// Retention for notification log entries before pruning.
pub const NOTIFICATION_LOG_RETENTION_DAYS: i64 = 90;
