//! Error types and retry classification for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Each variant is classified into a [`RetryClass`] via
/// [`retry_class`](Self::retry_class), which determines whether the provider
/// client attempts a single jittered retry before giving up.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The symbol does not match the ticker format (alphanumeric, dot,
    /// hyphen, at most 10 chars). Rejected before any network call.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider returned a non-success HTTP status.
    /// Carries the upstream status so callers can decide how to degrade.
    #[error("Provider error: {provider} - HTTP {status}: {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The upstream HTTP status code
        status: u16,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks
    /// (unparseable price, invalid timestamp, empty payload).
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Classification for retry policy.
///
/// The FMP client performs at most one retry, with jittered delay, and only
/// for errors classified as [`RetryClass::WithBackoff`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request is fundamentally invalid or the upstream
    /// answered definitively.
    Never,

    /// Transient failure - retry once with jittered backoff.
    WithBackoff,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::InvalidSymbol(_) | Self::ValidationFailed { .. } => RetryClass::Never,

            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::WithBackoff,

            // Non-success statuses are soft failures upstream; 5xx is worth
            // one retry, 4xx is definitive.
            Self::ProviderError { status, .. } => {
                if *status >= 500 {
                    RetryClass::WithBackoff
                } else {
                    RetryClass::Never
                }
            }

            Self::Network(e) => {
                if e.is_timeout() || e.is_connect() {
                    RetryClass::WithBackoff
                } else {
                    RetryClass::Never
                }
            }
        }
    }
}
