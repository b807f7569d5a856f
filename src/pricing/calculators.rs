//! Core pricing calculation functions.
//!
//! Pure functions for flight markup math - no I/O, no shared state.
//! Inputs are assumed validated by the caller; negative prices pass straight
//! through the arithmetic.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::config::{ConsolidatorCostModel, PricingConfig};
use super::models::{MarkupResult, ProfitBreakdown, ProfitEstimate, SupplierFeeBreakdown};

/// Round to specified decimal places, half away from zero.
///
/// A value exactly halfway between two candidates moves to the one with the
/// larger magnitude, so `0.125 -> 0.13` and `-0.125 -> -0.13`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use fare_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents.
pub fn round2(amount: Decimal) -> Decimal {
    round_money(amount, 2)
}

/// Round to one decimal place (percentages).
pub fn round1(amount: Decimal) -> Decimal {
    round_money(amount, 1)
}

/// Compute the customer price for an NDC aggregator net price.
///
/// The percentage markup is floored at `minimum_amount` and then capped at
/// `maximum_amount`; the cap wins if the two ever conflict. Supplier cost is
/// the per-order fee plus the optional variable fee on the net price.
///
/// Sums saturate at the Decimal range. A net price so small that the
/// effective percentage is not representable reports `Decimal::MAX`.
pub fn apply_markup(net_price: Decimal, config: &PricingConfig) -> MarkupResult {
    let markup_config = &config.markup;

    let raw_markup = net_price.saturating_mul(markup_config.percentage);
    let markup = raw_markup
        .max(markup_config.minimum_amount)
        .min(markup_config.maximum_amount);
    let markup = round2(markup);

    let customer_price = round2(net_price.saturating_add(markup));

    let variable_fee_pct = config.supplier.variable_fee_pct.unwrap_or(Decimal::ZERO);
    let supplier_cost = round2(
        config
            .supplier
            .per_order_fee
            .saturating_add(net_price.saturating_mul(variable_fee_pct)),
    );

    let net_profit = round2(markup.saturating_sub(supplier_cost));

    let effective_markup_pct = if net_price > Decimal::ZERO {
        effective_pct(markup, net_price)
    } else {
        Decimal::ZERO
    };

    MarkupResult {
        customer_price,
        markup_amount: markup,
        net_price,
        supplier_cost,
        net_profit,
        effective_markup_pct,
        currency: markup_config.currency,
    }
}

fn effective_pct(markup: Decimal, net_price: Decimal) -> Decimal {
    markup
        .checked_div(net_price)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(round1)
        .unwrap_or(Decimal::MAX)
}

/// Project total profit for a booking from flight markup plus ancillaries.
///
/// Ancillary profit uses a flat average markup, not the per-category rates.
pub fn estimate_profit(
    flight_price: Decimal,
    estimated_ancillary_revenue: Decimal,
    config: &PricingConfig,
) -> ProfitEstimate {
    let flight = apply_markup(flight_price, config);
    let ancillary_profit =
        round2(estimated_ancillary_revenue.saturating_mul(config.ancillary.average_markup_pct));
    let total_profit = round2(flight.net_profit.saturating_add(ancillary_profit));

    ProfitEstimate {
        flight_profit: flight.net_profit,
        ancillary_profit,
        total_profit,
        breakdown: ProfitBreakdown {
            markup_amount: flight.markup_amount,
            supplier_cost: flight.supplier_cost,
            ancillary_markup: ancillary_profit,
        },
        currency: flight.currency,
    }
}

/// Published NDC aggregator fee components
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierFeeSchedule {
    pub per_order_fee: Decimal,
    /// Managed-content fee as a fraction of the fare
    pub managed_content_pct: Decimal,
    /// Card processing fee as a fraction of the fare
    pub payment_processing_pct: Decimal,
}

impl SupplierFeeSchedule {
    pub fn with_per_order_fee(per_order_fee: Decimal) -> Self {
        Self {
            per_order_fee,
            ..Self::default()
        }
    }
}

impl Default for SupplierFeeSchedule {
    fn default() -> Self {
        Self {
            per_order_fee: dec!(3.00),
            managed_content_pct: dec!(0.01),
            payment_processing_pct: dec!(0.029),
        }
    }
}

/// Itemize what the NDC aggregator would charge for a fare.
pub fn supplier_fee_breakdown(
    total_fare: Decimal,
    fees: &SupplierFeeSchedule,
) -> SupplierFeeBreakdown {
    let managed_content_fee = round2(total_fare * fees.managed_content_pct);
    let payment_processing_fee = round2(total_fare * fees.payment_processing_pct);

    SupplierFeeBreakdown {
        per_order_fee: fees.per_order_fee,
        managed_content_fee,
        payment_processing_fee,
        total_cost: round2(fees.per_order_fee + managed_content_fee + payment_processing_fee),
    }
}

/// Commission earned on the consolidator channel, before its flat fee.
pub fn commission_amount(base_fare: Decimal, commission_rate: Decimal) -> Decimal {
    round2(base_fare * commission_rate)
}

/// Profit of settling through the consolidator: commission minus flat fee.
pub fn consolidator_profit(
    base_fare: Decimal,
    commission_rate: Decimal,
    costs: &ConsolidatorCostModel,
) -> Decimal {
    round2(commission_amount(base_fare, commission_rate) - costs.flat_fee)
}
