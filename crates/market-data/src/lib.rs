//! Market data access for FinClue.
//!
//! This crate wraps the Financial Modeling Prep (FMP) HTTP API behind the
//! [`QuoteProvider`] trait: batched latest quotes for ticker symbols and FX
//! pair rates. Symbol validation happens here, before any network I/O, and
//! all upstream failures are mapped to [`MarketDataError`] with an explicit
//! retry classification.

pub mod errors;
pub mod models;
pub mod provider;
pub mod symbol;
pub mod throttle;

pub use errors::{MarketDataError, RetryClass};
pub use models::Quote;
pub use provider::fmp::FmpProvider;
pub use provider::QuoteProvider;
pub use symbol::validate_symbol;
pub use throttle::Throttle;
