//! SQLite storage implementation for portfolios and holdings.

mod model;
mod repository;

pub use model::{HoldingDB, PortfolioDB};
pub use repository::PortfolioRepository;
