//! Watchlist dip alerting - entry models, threshold rules, and the evaluator.

mod alerts_errors;
mod alerts_model;
mod alerts_service;
mod alerts_traits;

pub use alerts_errors::AlertError;
pub use alerts_model::{DipAlert, NewWatchlistEntry, WatchlistEntry};
pub use alerts_service::{dip_percent, AlertService};
pub use alerts_traits::{AlertServiceTrait, WatchlistRepositoryTrait};
