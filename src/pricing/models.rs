//! Value records produced and consumed by the pricing engine.
//!
//! All of these are created per call and owned by the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::config::Currency;

/// Output of [`apply_markup`](super::calculators::apply_markup)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupResult {
    #[serde(with = "rust_decimal::serde::str")]
    pub customer_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub markup_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub net_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub supplier_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub net_profit: Decimal,
    /// Markup as a percentage of net price, one decimal place
    #[serde(with = "rust_decimal::serde::str")]
    pub effective_markup_pct: Decimal,
    pub currency: Currency,
}

/// Intermediate figures behind a profit estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub markup_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub supplier_cost: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ancillary_markup: Decimal,
}

/// Projected profit for a booking (reporting only, never charged)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitEstimate {
    #[serde(with = "rust_decimal::serde::str")]
    pub flight_profit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ancillary_profit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_profit: Decimal,
    pub breakdown: ProfitBreakdown,
    pub currency: Currency,
}

/// Itemized NDC aggregator fees for a fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierFeeBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub per_order_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub managed_content_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub payment_processing_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_cost: Decimal,
}

/// Passenger type codes as used on fares
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PassengerType {
    #[default]
    Adt,
    Chd,
    Inf,
}

/// The parts of a supplier offer that routing rules look at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferProfile {
    /// Marketing carrier of the first segment (IATA code)
    pub marketing_carrier: String,
    #[serde(default)]
    pub fare_basis_code: Option<String>,
    pub base_fare: Decimal,
    pub total_fare: Decimal,
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: u32,
    #[serde(default)]
    pub is_group_booking: bool,
}

fn default_passenger_count() -> u32 {
    1
}
