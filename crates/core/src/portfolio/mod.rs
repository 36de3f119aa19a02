//! Portfolio domain - holdings, valuation models, and the valuation service.

mod portfolio_model;
mod portfolio_traits;
mod valuation_service;

pub use portfolio_model::{
    Holding, NewHolding, Portfolio, PortfolioValuation, PositionStatus, PositionValuation,
};
pub use portfolio_traits::{PortfolioRepositoryTrait, ValuationServiceTrait};
pub use valuation_service::ValuationService;
