use thiserror::Error;

/// Errors specific to watchlist alert evaluation.
#[derive(Error, Debug)]
pub enum AlertError {
    /// Threshold outside the accepted `(0, 100]` percent range.
    #[error("Invalid dip threshold {0}: must be greater than 0 and at most 100")]
    InvalidThreshold(String),

    /// Reference high must be positive to anchor a dip percentage.
    #[error("Invalid reference high {0}: must be greater than 0")]
    InvalidReferenceHigh(String),

    #[error("Watchlist entry not found: {0}")]
    EntryNotFound(String),

    #[error("Alert evaluation failed: {0}")]
    EvaluationFailed(String),
}
