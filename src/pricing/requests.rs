//! Request DTOs for pricing API endpoints.
//!
//! Amounts may be sent as JSON strings (`"100.50"`) or numbers (`100.5`).

use rust_decimal::Decimal;
use serde::Deserialize;

use super::config::Currency;
use super::models::OfferProfile;

/// Request to confirm the customer price of a supplier offer
#[derive(Debug, Deserialize)]
pub struct ConfirmPriceRequest {
    /// Supplier offer identifier, echoed back on the quote
    pub offer_id: String,
    pub net_price: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
}

/// Request to pick a supply channel
#[derive(Debug, Deserialize)]
pub struct RouteChannelRequest {
    pub total_fare: Decimal,
    pub has_commission: bool,
}

/// Request to assess an offer against both channels
#[derive(Debug, Deserialize)]
pub struct AssessOfferRequest {
    #[serde(flatten)]
    pub offer: OfferProfile,
    /// Commission rate from the airline contract, as a fraction
    #[serde(default)]
    pub commission_rate: Option<Decimal>,
}

/// Request to project booking profit
#[derive(Debug, Deserialize)]
pub struct EstimateProfitRequest {
    pub flight_price: Decimal,
    #[serde(default)]
    pub estimated_ancillary_revenue: Option<Decimal>,
}

/// Request to itemize supplier fees for a fare
#[derive(Debug, Deserialize)]
pub struct SupplierFeesRequest {
    pub total_fare: Decimal,
}
