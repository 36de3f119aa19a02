use super::portfolio_model::{
    Portfolio, PortfolioValuation, PositionStatus, PositionValuation,
};
use super::portfolio_traits::ValuationServiceTrait;
use crate::constants::{QUOTE_CURRENCY, REPORTING_CURRENCY};
use crate::errors::{Error, Result};
use crate::fx::{FxError, FxServiceTrait, RateSnapshot};
use async_trait::async_trait;
use finclue_market_data::QuoteProvider;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Combines holdings, live quotes, and the exchange rate into per-position
/// and aggregate values.
///
/// All currency conversion happens here, in exactly one step per position:
/// quotes arrive in the provider's currency (USD) and are multiplied once by
/// the USD to EUR rate. No other component performs currency math.
pub struct ValuationService {
    quote_provider: Arc<dyn QuoteProvider>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl ValuationService {
    pub fn new(quote_provider: Arc<dyn QuoteProvider>, fx_service: Arc<dyn FxServiceTrait>) -> Self {
        Self {
            quote_provider,
            fx_service,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn valuate(&self, portfolio: &Portfolio) -> Result<PortfolioValuation> {
        let symbols: Vec<String> = portfolio
            .holdings
            .iter()
            .map(|h| h.symbol.clone())
            .collect();

        debug!(
            "Valuating portfolio {} ({} holdings)",
            portfolio.id,
            symbols.len()
        );

        // Quote and rate fetches have no data dependency; issue them
        // concurrently and wait for both.
        let (quotes_result, rate_result) = tokio::join!(
            self.quote_provider.get_quotes(&symbols),
            self.fx_service.get_rate(QUOTE_CURRENCY, REPORTING_CURRENCY),
        );

        let quotes = quotes_result?;

        let (rate, converted, fx_stale) = match rate_result {
            Ok(RateSnapshot { rate, stale, .. }) => (rate, true, stale),
            Err(Error::Fx(FxError::RateUnavailable { message, .. })) => {
                // Degrade to a quote-currency result rather than inventing a
                // rate or failing the whole request.
                warn!(
                    "Exchange rate unavailable ({}), returning unconverted valuation for {}",
                    message, portfolio.id
                );
                (Decimal::ONE, false, false)
            }
            Err(e) => return Err(e),
        };

        let mut positions = Vec::with_capacity(portfolio.holdings.len());
        let mut unpriced_symbols = Vec::new();
        let mut stock_value = Decimal::ZERO;

        for holding in &portfolio.holdings {
            match quotes.get(&holding.symbol) {
                Some(quote) => {
                    let value = holding.quantity * quote.price * rate;
                    stock_value += value;
                    positions.push(PositionValuation {
                        symbol: holding.symbol.clone(),
                        quantity: holding.quantity,
                        cost_basis: holding.cost_basis,
                        price: Some(quote.price * rate),
                        value: Some(value),
                        // Cost basis is stored in the reporting currency, so
                        // gains are only meaningful on converted results.
                        gain_loss: converted.then(|| value - holding.cost_basis),
                        status: PositionStatus::Valued,
                    });
                }
                None => {
                    warn!(
                        "No quote for held symbol {} in portfolio {}",
                        holding.symbol, portfolio.id
                    );
                    unpriced_symbols.push(holding.symbol.clone());
                    positions.push(PositionValuation {
                        symbol: holding.symbol.clone(),
                        quantity: holding.quantity,
                        cost_basis: holding.cost_basis,
                        price: None,
                        value: None,
                        gain_loss: None,
                        status: PositionStatus::QuoteMissing,
                    });
                }
            }
        }

        let cash_value = portfolio.cash;
        // Stock and cash are only summable when both are in the reporting
        // currency.
        let total_value = converted.then(|| stock_value + cash_value);

        Ok(PortfolioValuation {
            portfolio_id: portfolio.id.clone(),
            currency: if converted {
                REPORTING_CURRENCY.to_string()
            } else {
                QUOTE_CURRENCY.to_string()
            },
            converted,
            fx_stale,
            stock_value,
            cash_value,
            total_value,
            positions,
            unpriced_symbols,
        })
    }
}
