use super::fx_model::RateSnapshot;
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for FX rate lookups.
///
/// Implementations cache aggressively; a fresh cached rate must be returned
/// without any network call.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Current rate for converting `from` into `to`.
    ///
    /// Returns a stale-flagged snapshot when the upstream is down but an
    /// older rate is cached; fails with `FxError::RateUnavailable` when there
    /// is nothing usable at all.
    async fn get_rate(&self, from: &str, to: &str) -> Result<RateSnapshot>;

    /// Force a fetch regardless of cache freshness.
    async fn refresh(&self, from: &str, to: &str) -> Result<RateSnapshot>;

    /// Drop all cached rates. Test hook and admin escape hatch.
    fn invalidate(&self);
}
