//! Core domain logic for the FinClue valuation and alerting service.
//!
//! The pipeline has five collaborators, leaves first:
//!
//! - [`fx`]: TTL-cached USD/EUR exchange rate lookup against an external
//!   FX source, with an explicit no-fabricated-fallback policy.
//! - quote fetching (the `finclue-market-data` crate, consumed via trait).
//! - [`portfolio`]: combines holdings, live quotes and the exchange rate
//!   into per-position and aggregate values in the reporting currency.
//! - [`alerts`]: flags watched tickers whose drawdown from a reference high
//!   exceeds a per-entry threshold.
//! - [`notifications`]: dedups flagged alerts against a sent-log and hands
//!   them to a mailer, at most once per ticker per cooldown window.
//!
//! Storage is abstracted behind repository traits; the SQLite implementation
//! lives in `finclue-storage-sqlite`.

pub mod alerts;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod notifications;
pub mod portfolio;

pub use errors::{Error, Result};
