//! Property-based tests for dip math and valuation aggregation.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use finclue_core::alerts::dip_percent;
use finclue_core::portfolio::{
    PortfolioValuation, PositionStatus, PositionValuation,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Positive price in cents, up to 100_000.00.
fn arb_price_cents() -> impl Strategy<Value = i64> {
    1i64..10_000_000
}

/// Quantity in thousandths of a share, up to 10_000.000.
fn arb_quantity_millis() -> impl Strategy<Value = i64> {
    0i64..10_000_000
}

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn millis(value: i64) -> Decimal {
    Decimal::new(value, 3)
}

fn valuation(positions: Vec<PositionValuation>, cash: Decimal) -> PortfolioValuation {
    let stock_value: Decimal = positions.iter().filter_map(|p| p.value).sum();
    PortfolioValuation {
        portfolio_id: "p1".to_string(),
        currency: "EUR".to_string(),
        converted: true,
        fx_stale: false,
        stock_value,
        cash_value: cash,
        total_value: Some(stock_value + cash),
        positions,
        unpriced_symbols: Vec::new(),
    }
}

fn position(symbol: &str, quantity: Decimal, price: Decimal) -> PositionValuation {
    let value = quantity * price;
    PositionValuation {
        symbol: symbol.to_string(),
        quantity,
        cost_basis: Decimal::ZERO,
        price: Some(price),
        value: Some(value),
        gain_loss: Some(value),
        status: PositionStatus::Valued,
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A price at the reference high means no dip at all.
    #[test]
    fn prop_dip_is_zero_at_reference_high(high_cents in arb_price_cents()) {
        let high = cents(high_cents);
        prop_assert_eq!(dip_percent(high, high), Decimal::ZERO);
    }

    /// The dip is bounded by [0, 100] for prices within (0, high].
    #[test]
    fn prop_dip_bounded_for_prices_below_high(
        high_cents in arb_price_cents(),
        price_cents in arb_price_cents(),
    ) {
        let high = cents(high_cents);
        let price = cents(price_cents.min(high_cents));
        let dip = dip_percent(high, price);
        prop_assert!(dip >= Decimal::ZERO);
        prop_assert!(dip <= Decimal::ONE_HUNDRED);
    }

    /// A lower price never yields a smaller dip.
    #[test]
    fn prop_dip_monotone_as_price_falls(
        high_cents in arb_price_cents(),
        a_cents in arb_price_cents(),
        b_cents in arb_price_cents(),
    ) {
        let high = cents(high_cents);
        let (lower, upper) = if a_cents <= b_cents {
            (cents(a_cents), cents(b_cents))
        } else {
            (cents(b_cents), cents(a_cents))
        };
        prop_assert!(dip_percent(high, lower) >= dip_percent(high, upper));
    }

    /// A price above the reference high reads as a negative dip, which can
    /// never cross a positive threshold.
    #[test]
    fn prop_price_above_high_is_negative_dip(
        high_cents in arb_price_cents(),
        extra_cents in 1i64..10_000_000,
    ) {
        let high = cents(high_cents);
        let price = cents(high_cents + extra_cents);
        prop_assert!(dip_percent(high, price) < Decimal::ZERO);
    }

    /// Total value is exactly stock value plus cash, for any mix of
    /// positions.
    #[test]
    fn prop_total_is_stock_plus_cash(
        quantities in proptest::collection::vec(arb_quantity_millis(), 0..8),
        prices in proptest::collection::vec(arb_price_cents(), 8),
        cash_cents in 0i64..100_000_000,
    ) {
        let positions: Vec<PositionValuation> = quantities
            .iter()
            .zip(prices.iter())
            .enumerate()
            .map(|(i, (q, p))| position(&format!("S{}", i), millis(*q), cents(*p)))
            .collect();
        let cash = cents(cash_cents);
        let valuation = valuation(positions, cash);

        let position_sum: Decimal = valuation
            .positions
            .iter()
            .filter_map(|p| p.value)
            .sum();
        prop_assert_eq!(valuation.stock_value, position_sum);
        prop_assert_eq!(
            valuation.total_value,
            Some(valuation.stock_value + valuation.cash_value)
        );
    }

    /// Position weights are non-negative and sum to at most 1 when cash is
    /// non-negative.
    #[test]
    fn prop_position_weights_bounded(
        quantities in proptest::collection::vec(1i64..10_000_000, 1..6),
        prices in proptest::collection::vec(arb_price_cents(), 6),
        cash_cents in 1i64..100_000_000,
    ) {
        let positions: Vec<PositionValuation> = quantities
            .iter()
            .zip(prices.iter())
            .enumerate()
            .map(|(i, (q, p))| position(&format!("S{}", i), millis(*q), cents(*p)))
            .collect();
        let valuation = valuation(positions, cents(cash_cents));

        let mut weight_sum = Decimal::ZERO;
        for pos in &valuation.positions {
            let weight = valuation.position_weight(&pos.symbol);
            prop_assert!(weight >= Decimal::ZERO);
            weight_sum += weight;
        }
        prop_assert!(weight_sum <= Decimal::ONE);
    }
}
