use super::portfolio_model::{Holding, Portfolio, PortfolioValuation};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait defining the contract for portfolio storage.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Fetches the owner's portfolio, creating an empty one on first use.
    async fn get_or_create_for_owner(&self, owner_id: &str) -> Result<Portfolio>;

    /// Inserts or replaces the holding for its symbol within the portfolio.
    async fn upsert_holding(&self, portfolio_id: &str, holding: Holding) -> Result<Holding>;

    async fn remove_holding(&self, portfolio_id: &str, symbol: &str) -> Result<()>;

    async fn set_cash(&self, portfolio_id: &str, cash: rust_decimal::Decimal) -> Result<()>;
}

/// Trait defining the contract for the valuation service.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Values the portfolio in the reporting currency, degrading to a
    /// flagged quote-currency result when the exchange rate is unavailable.
    async fn valuate(&self, portfolio: &Portfolio) -> Result<PortfolioValuation>;
}
