use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    /// Currency codes must be 3 alphabetic characters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    /// The FX source failed and no cached value exists for the pair.
    /// Callers must not substitute a guessed rate.
    #[error("Exchange rate unavailable for {base}/{quote}: {message}")]
    RateUnavailable {
        base: String,
        quote: String,
        message: String,
    },

    /// The source returned a rate that violates the rate > 0 invariant.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Rate cache error: {0}")]
    CacheError(String),
}
