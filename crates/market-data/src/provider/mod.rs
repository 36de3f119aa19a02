//! Market data provider implementations.

pub mod fmp;
mod traits;

pub use traits::QuoteProvider;
