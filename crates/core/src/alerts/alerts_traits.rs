use super::alerts_model::{DipAlert, NewWatchlistEntry, WatchlistEntry};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining watchlist persistence operations.
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    /// All entries for one owner.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<WatchlistEntry>>;

    /// All entries across all owners, for the scheduled sweep.
    async fn list_all(&self) -> Result<Vec<WatchlistEntry>>;

    /// Insert or update the entry keyed by `(owner_id, symbol)`.
    async fn upsert_entry(&self, entry: NewWatchlistEntry) -> Result<WatchlistEntry>;

    /// Remove one watched symbol. Fails with `NotFound` when absent.
    async fn remove_entry(&self, owner_id: &str, symbol: &str) -> Result<()>;
}

/// Trait defining alert evaluation for a set of watchlist entries.
#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    /// Evaluates the owner's watchlist against live quotes and returns the
    /// triggered dips, deepest first.
    async fn evaluate_for_owner(&self, owner_id: &str) -> Result<Vec<DipAlert>>;

    /// Evaluates every watchlist entry in the system. Used by the
    /// notification run.
    async fn evaluate_all(&self) -> Result<Vec<DipAlert>>;
}
