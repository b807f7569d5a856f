//! Static pricing configuration for the flight engine.
//!
//! Built once at startup, validated, then shared read-only behind an `Arc`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Supported settlement currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Mxn,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Cad,
        Currency::Mxn,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Mxn => "MXN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == upper)
            .ok_or_else(|| ConfigError::UnsupportedCurrency(s.to_string()))
    }
}

/// Configuration errors, raised at startup only.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid pricing configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Markup policy for the NDC aggregator channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// Fraction of the net price, e.g. `0.07` for 7%
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub maximum_amount: Decimal,
    pub currency: Currency,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            percentage: dec!(0.07),
            minimum_amount: dec!(22.00),
            maximum_amount: dec!(200.00),
            currency: Currency::Usd,
        }
    }
}

/// What the NDC aggregator charges us per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCostModel {
    #[serde(with = "rust_decimal::serde::str")]
    pub per_order_fee: Decimal,
    /// Fraction of the net price; `None` means no variable fee
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub variable_fee_pct: Option<Decimal>,
}

impl Default for SupplierCostModel {
    fn default() -> Self {
        Self {
            per_order_fee: dec!(3.00),
            variable_fee_pct: None,
        }
    }
}

/// Consolidator fees. Profit on this channel comes from airline commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatorCostModel {
    #[serde(with = "rust_decimal::serde::str")]
    pub flat_fee: Decimal,
}

impl Default for ConsolidatorCostModel {
    fn default() -> Self {
        Self {
            flat_fee: dec!(5.00),
        }
    }
}

/// Fare boundary between ancillary-first and commission-first routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingThreshold {
    #[serde(with = "rust_decimal::serde::str")]
    pub price_threshold: Decimal,
}

impl Default for RoutingThreshold {
    fn default() -> Self {
        Self {
            price_threshold: dec!(500),
        }
    }
}

/// Flat assumption used for ancillary profit projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncillaryConfig {
    #[serde(with = "rust_decimal::serde::str")]
    pub average_markup_pct: Decimal,
}

impl Default for AncillaryConfig {
    fn default() -> Self {
        Self {
            average_markup_pct: dec!(0.25),
        }
    }
}

/// Everything the engine needs to price and route an offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub markup: MarkupConfig,
    pub supplier: SupplierCostModel,
    pub consolidator: ConsolidatorCostModel,
    pub routing: RoutingThreshold,
    pub ancillary: AncillaryConfig,
}

impl PricingConfig {
    /// Check the configuration invariants, collecting every violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let unit = Decimal::ZERO..=Decimal::ONE;

        if !unit.contains(&self.markup.percentage) {
            errors.push(format!(
                "markup.percentage must be within [0, 1], got {}",
                self.markup.percentage
            ));
        }
        if self.markup.minimum_amount.is_sign_negative() {
            errors.push(format!(
                "markup.minimum_amount must not be negative, got {}",
                self.markup.minimum_amount
            ));
        }
        if self.markup.minimum_amount > self.markup.maximum_amount {
            errors.push(format!(
                "markup.minimum_amount ({}) exceeds markup.maximum_amount ({})",
                self.markup.minimum_amount, self.markup.maximum_amount
            ));
        }
        if self.supplier.per_order_fee.is_sign_negative() {
            errors.push(format!(
                "supplier.per_order_fee must not be negative, got {}",
                self.supplier.per_order_fee
            ));
        }
        if let Some(pct) = self.supplier.variable_fee_pct {
            if !unit.contains(&pct) {
                errors.push(format!(
                    "supplier.variable_fee_pct must be within [0, 1], got {}",
                    pct
                ));
            }
        }
        if self.consolidator.flat_fee.is_sign_negative() {
            errors.push(format!(
                "consolidator.flat_fee must not be negative, got {}",
                self.consolidator.flat_fee
            ));
        }
        if self.routing.price_threshold.is_sign_negative() {
            errors.push(format!(
                "routing.price_threshold must not be negative, got {}",
                self.routing.price_threshold
            ));
        }
        if !unit.contains(&self.ancillary.average_markup_pct) {
            errors.push(format!(
                "ancillary.average_markup_pct must be within [0, 1], got {}",
                self.ancillary.average_markup_pct
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
