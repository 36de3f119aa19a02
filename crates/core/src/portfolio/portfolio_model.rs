use crate::errors::{Result, ValidationError};
use finclue_market_data::validate_symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One position in a portfolio. Unique by symbol within its portfolio.
///
/// `cost_basis` is the total purchase cost of the position in the reporting
/// currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

/// Payload for creating or updating a holding.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub symbol: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl NewHolding {
    /// Validates quantity and symbol format before anything touches storage
    /// or the network.
    pub fn validate(self) -> Result<Holding> {
        if self.quantity < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Quantity must be non-negative, got {}",
                self.quantity
            ))
            .into());
        }
        let symbol = validate_symbol(&self.symbol)?;
        Ok(Holding {
            symbol,
            quantity: self.quantity,
            cost_basis: self.cost_basis,
        })
    }
}

/// A user's portfolio: holdings plus a cash balance in the reporting
/// currency.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub owner_id: String,
    pub holdings: Vec<Holding>,
    pub cash: Decimal,
}

/// Whether a position could be priced in this valuation pass.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PositionStatus {
    Valued,
    /// No quote was available; the position contributes nothing to the
    /// totals and is surfaced distinctly from a zero value.
    QuoteMissing,
}

/// Per-position output of a valuation pass, in the valuation's currency.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub symbol: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub price: Option<Decimal>,
    pub value: Option<Decimal>,
    /// Unrealized gain against cost basis. Only present when the valuation
    /// is in the reporting currency, since cost basis is stored there.
    pub gain_loss: Option<Decimal>,
    pub status: PositionStatus,
}

/// Aggregate output of a valuation pass.
///
/// Invariant: `total_value = stock_value + cash_value` exactly whenever
/// `total_value` is present. Rounding happens at display time only.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub portfolio_id: String,
    /// Currency the values are denominated in. The reporting currency when
    /// `converted`, otherwise the provider's quote currency.
    pub currency: String,
    /// False when the exchange rate was unavailable and values were left in
    /// the quote currency. Never presented as an authoritative total.
    pub converted: bool,
    /// True when the conversion used a stale cached rate.
    pub fx_stale: bool,
    pub stock_value: Decimal,
    pub cash_value: Decimal,
    /// Absent when the result is currency-unconverted (stock and cash would
    /// be in different currencies).
    pub total_value: Option<Decimal>,
    #[serde(rename = "perPosition")]
    pub positions: Vec<PositionValuation>,
    /// Symbols whose quotes could not be refreshed this pass.
    pub unpriced_symbols: Vec<String>,
}

impl PortfolioValuation {
    /// Cash share of the total, 0 when the total is absent or non-positive.
    pub fn cash_ratio(&self) -> Decimal {
        match self.total_value {
            Some(total) if total > Decimal::ZERO => self.cash_value / total,
            _ => Decimal::ZERO,
        }
    }

    /// Weight of one position in the total, 0 when unpriced or the total is
    /// non-positive.
    pub fn position_weight(&self, symbol: &str) -> Decimal {
        let total = match self.total_value {
            Some(total) if total > Decimal::ZERO => total,
            _ => return Decimal::ZERO,
        };
        self.positions
            .iter()
            .find(|p| p.symbol == symbol)
            .and_then(|p| p.value)
            .map(|v| v / total)
            .unwrap_or(Decimal::ZERO)
    }
}
