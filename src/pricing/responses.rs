//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::config::Currency;
use super::services::ConfirmedQuote;

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: Currency,
}

/// Response for a confirmed or retrieved quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub offer_id: String,
    pub customer_price: MoneyResponse,
    pub net_price: MoneyResponse,
    pub markup_amount: MoneyResponse,
    pub supplier_cost: MoneyResponse,
    pub net_profit: MoneyResponse,
    #[serde(with = "rust_decimal::serde::str")]
    pub effective_markup_pct: Decimal,
    pub confirmed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&ConfirmedQuote> for QuoteResponse {
    fn from(quote: &ConfirmedQuote) -> Self {
        let pricing = &quote.pricing;
        let money = |amount: Decimal| MoneyResponse {
            amount,
            currency: pricing.currency,
        };

        Self {
            quote_id: quote.quote_id,
            offer_id: quote.offer_id.clone(),
            customer_price: money(pricing.customer_price),
            net_price: money(pricing.net_price),
            markup_amount: money(pricing.markup_amount),
            supplier_cost: money(pricing.supplier_cost),
            net_profit: money(pricing.net_profit),
            effective_markup_pct: pricing.effective_markup_pct,
            confirmed_at: quote.confirmed_at,
            expires_at: quote.expires_at,
        }
    }
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub quotes_cached: u64,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
