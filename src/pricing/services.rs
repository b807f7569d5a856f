//! Pricing service used by the HTTP layer.
//!
//! Holds the validated configuration and the quote cache. Requests are checked
//! here before they reach the pure calculators, which do no validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::AppCache;

use super::calculators::{self, SupplierFeeSchedule};
use super::config::{ConfigError, Currency, PricingConfig};
use super::models::{MarkupResult, ProfitEstimate, SupplierFeeBreakdown};
use super::requests::{
    AssessOfferRequest, ConfirmPriceRequest, EstimateProfitRequest, RouteChannelRequest,
    SupplierFeesRequest,
};
use super::routing::{self, ChannelAssessment, RoutingDecision};

/// Largest amount accepted from callers; keeps Decimal arithmetic far from overflow
const MAX_AMOUNT: Decimal = dec!(1000000000);

/// A customer price fixed for a supplier offer
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedQuote {
    pub quote_id: Uuid,
    pub offer_id: String,
    pub pricing: MarkupResult,
    pub confirmed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Pricing calculation error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidAmount {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },

    #[error("Currency mismatch: engine prices in {expected}, request used {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Quote {quote_id} not found or expired")]
    QuoteNotFound { quote_id: Uuid },
}

fn validate_amount(field: &'static str, value: Decimal) -> Result<Decimal, PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::InvalidAmount {
            field,
            value,
            reason: "must not be negative",
        });
    }
    if value > MAX_AMOUNT {
        return Err(PricingError::InvalidAmount {
            field,
            value,
            reason: "exceeds maximum supported amount",
        });
    }
    Ok(value)
}

fn require(field: &'static str, value: &str) -> Result<(), PricingError> {
    if value.trim().is_empty() {
        return Err(PricingError::MissingField { field });
    }
    Ok(())
}

/// Stateless pricing front end, built once at startup
#[derive(Clone)]
pub struct PricingService {
    config: Arc<PricingConfig>,
    cache: AppCache,
}

impl PricingService {
    /// Build the service, refusing an invalid configuration.
    pub fn new(config: PricingConfig, cache: AppCache) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            cache,
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn cache(&self) -> &AppCache {
        &self.cache
    }

    pub fn apply_markup(&self, net_price: Decimal) -> MarkupResult {
        calculators::apply_markup(net_price, &self.config)
    }

    pub fn route_channel(&self, total_fare: Decimal, has_commission: bool) -> RoutingDecision {
        routing::route_channel(total_fare, has_commission, &self.config.routing)
    }

    pub fn estimate_profit(
        &self,
        flight_price: Decimal,
        estimated_ancillary_revenue: Decimal,
    ) -> ProfitEstimate {
        calculators::estimate_profit(flight_price, estimated_ancillary_revenue, &self.config)
    }

    /// Confirm the customer price for a supplier offer and hold it as a quote.
    pub async fn confirm_price(
        &self,
        request: &ConfirmPriceRequest,
    ) -> Result<ConfirmedQuote, PricingError> {
        require("offer_id", &request.offer_id)?;
        let net_price = validate_amount("net_price", request.net_price)?;

        let expected = self.config.markup.currency;
        if let Some(actual) = request.currency {
            if actual != expected {
                return Err(PricingError::CurrencyMismatch { expected, actual });
            }
        }

        let pricing = self.apply_markup(net_price);
        let confirmed_at = Utc::now();
        let ttl = chrono::Duration::from_std(self.cache.quote_ttl())
            .unwrap_or(chrono::Duration::MAX);

        let quote = ConfirmedQuote {
            quote_id: Uuid::new_v4(),
            offer_id: request.offer_id.clone(),
            pricing,
            confirmed_at,
            expires_at: confirmed_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.cache
            .quotes
            .insert(quote.quote_id, Arc::new(quote.clone()))
            .await;

        info!(
            quote_id = %quote.quote_id,
            offer_id = %quote.offer_id,
            net_price = %quote.pricing.net_price,
            customer_price = %quote.pricing.customer_price,
            net_profit = %quote.pricing.net_profit,
            "Price confirmed"
        );

        Ok(quote)
    }

    /// Look up a quote that has not yet expired.
    pub async fn get_quote(&self, quote_id: Uuid) -> Result<ConfirmedQuote, PricingError> {
        match self.cache.quotes.get(&quote_id).await {
            Some(quote) => {
                debug!("Cache HIT for quote: {}", quote_id);
                Ok((*quote).clone())
            }
            None => {
                debug!("Cache MISS for quote: {}", quote_id);
                Err(PricingError::QuoteNotFound { quote_id })
            }
        }
    }

    /// Drop a quote once the booking flow is done with it.
    pub async fn release_quote(&self, quote_id: Uuid) -> Result<(), PricingError> {
        match self.cache.remove_quote(&quote_id).await {
            Some(_) => Ok(()),
            None => Err(PricingError::QuoteNotFound { quote_id }),
        }
    }

    pub fn route(&self, request: &RouteChannelRequest) -> Result<RoutingDecision, PricingError> {
        let total_fare = validate_amount("total_fare", request.total_fare)?;
        let decision = self.route_channel(total_fare, request.has_commission);

        info!(
            total_fare = %total_fare,
            has_commission = request.has_commission,
            channel = decision.channel.as_str(),
            reason = decision.reason.code(),
            "Routing decision"
        );

        Ok(decision)
    }

    /// Assess an offer against both channels using its contract commission.
    pub fn assess(&self, request: &AssessOfferRequest) -> Result<ChannelAssessment, PricingError> {
        let offer = &request.offer;
        require("marketing_carrier", &offer.marketing_carrier)?;
        validate_amount("base_fare", offer.base_fare)?;
        validate_amount("total_fare", offer.total_fare)?;
        let commission_rate = request
            .commission_rate
            .map(|rate| {
                if rate > Decimal::ONE {
                    Err(PricingError::InvalidAmount {
                        field: "commission_rate",
                        value: rate,
                        reason: "must be a fraction within [0, 1]",
                    })
                } else {
                    validate_amount("commission_rate", rate)
                }
            })
            .transpose()?;

        let assessment = routing::assess_offer(offer, commission_rate, &self.config);

        info!(
            airline = %offer.marketing_carrier,
            total_fare = %offer.total_fare,
            channel = assessment.decision.channel.as_str(),
            reason = assessment.decision.reason.code(),
            estimated_profit = %assessment.estimated_profit,
            ndc_profit = %assessment.ndc_profit,
            consolidator_profit = %assessment.consolidator_profit,
            "Routing decision"
        );

        Ok(assessment)
    }

    pub fn estimate(&self, request: &EstimateProfitRequest) -> Result<ProfitEstimate, PricingError> {
        let flight_price = validate_amount("flight_price", request.flight_price)?;
        let ancillary = validate_amount(
            "estimated_ancillary_revenue",
            request.estimated_ancillary_revenue.unwrap_or(Decimal::ZERO),
        )?;
        Ok(self.estimate_profit(flight_price, ancillary))
    }

    pub fn supplier_fees(
        &self,
        request: &SupplierFeesRequest,
    ) -> Result<SupplierFeeBreakdown, PricingError> {
        let total_fare = validate_amount("total_fare", request.total_fare)?;
        let schedule = SupplierFeeSchedule::with_per_order_fee(self.config.supplier.per_order_fee);
        Ok(calculators::supplier_fee_breakdown(total_fare, &schedule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{OfferProfile, PassengerType};
    use crate::pricing::routing::{Channel, RoutingReason};
    use std::time::Duration;

    fn service() -> PricingService {
        PricingService::new(
            PricingConfig::default(),
            AppCache::new(Duration::from_secs(900)),
        )
        .unwrap()
    }

    fn confirm_request(net_price: Decimal) -> ConfirmPriceRequest {
        ConfirmPriceRequest {
            offer_id: "off_0000AgX".to_string(),
            net_price,
            currency: None,
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidAmount {
            field: "net_price",
            value: dec!(-1),
            reason: "must not be negative",
        };
        assert!(err.to_string().contains("net_price"));

        let err = PricingError::CurrencyMismatch {
            expected: Currency::Usd,
            actual: Currency::Eur,
        };
        assert!(err.to_string().contains("USD"));
        assert!(err.to_string().contains("EUR"));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = PricingConfig::default();
        config.markup.minimum_amount = dec!(500);
        let result = PricingService::new(config, AppCache::new(Duration::from_secs(60)));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_confirm_price_stores_quote() {
        let service = service();
        let quote = service.confirm_price(&confirm_request(dec!(500))).await.unwrap();

        assert_eq!(quote.pricing.customer_price, dec!(535.00));
        assert_eq!(quote.expires_at - quote.confirmed_at, chrono::Duration::seconds(900));

        let fetched = service.get_quote(quote.quote_id).await.unwrap();
        assert_eq!(fetched.offer_id, "off_0000AgX");
        assert_eq!(fetched.pricing, quote.pricing);
    }

    #[tokio::test]
    async fn test_confirm_price_rejects_negative() {
        let err = service()
            .confirm_price(&confirm_request(dec!(-0.01)))
            .await
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidAmount { field: "net_price", .. }));
    }

    #[tokio::test]
    async fn test_confirm_price_accepts_negative_zero() {
        let quote = service()
            .confirm_price(&confirm_request(-Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(quote.pricing.customer_price, dec!(22));
    }

    #[tokio::test]
    async fn test_confirm_price_rejects_other_currency() {
        let mut request = confirm_request(dec!(100));
        request.currency = Some(Currency::Eur);
        let err = service().confirm_price(&request).await.unwrap_err();
        assert!(matches!(
            err,
            PricingError::CurrencyMismatch {
                expected: Currency::Usd,
                actual: Currency::Eur
            }
        ));

        request.currency = Some(Currency::Usd);
        assert!(service().confirm_price(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_confirm_price_requires_offer_id() {
        let mut request = confirm_request(dec!(100));
        request.offer_id = "  ".to_string();
        let err = service().confirm_price(&request).await.unwrap_err();
        assert!(matches!(err, PricingError::MissingField { field: "offer_id" }));
    }

    #[tokio::test]
    async fn test_get_quote_unknown() {
        let id = Uuid::new_v4();
        let err = service().get_quote(id).await.unwrap_err();
        assert!(matches!(err, PricingError::QuoteNotFound { quote_id } if quote_id == id));
    }

    #[tokio::test]
    async fn test_release_quote() {
        let service = service();
        let quote = service.confirm_price(&confirm_request(dec!(100))).await.unwrap();

        service.release_quote(quote.quote_id).await.unwrap();
        assert!(service.get_quote(quote.quote_id).await.is_err());
        assert!(service.release_quote(quote.quote_id).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_release_succeeds_once() {
        let service = service();
        let quote = service.confirm_price(&confirm_request(dec!(100))).await.unwrap();

        let (first, second) = tokio::join!(
            service.release_quote(quote.quote_id),
            service.release_quote(quote.quote_id)
        );
        assert_eq!(
            [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );
        assert!(service.cache().quotes.get(&quote.quote_id).await.is_none());
    }

    #[tokio::test]
    async fn test_confirm_price_tiny_net_price() {
        let quote = service()
            .confirm_price(&confirm_request(Decimal::new(1, 28)))
            .await
            .unwrap();
        assert_eq!(quote.pricing.customer_price, dec!(22.00));
        assert_eq!(quote.pricing.effective_markup_pct, Decimal::MAX);
    }

    #[test]
    fn test_route_validates_fare() {
        let service = service();
        let decision = service
            .route(&RouteChannelRequest {
                total_fare: dec!(600),
                has_commission: false,
            })
            .unwrap();
        assert_eq!(decision.reason, RoutingReason::OverThresholdNoCommission);

        assert!(service
            .route(&RouteChannelRequest {
                total_fare: dec!(-5),
                has_commission: true,
            })
            .is_err());
    }

    #[test]
    fn test_assess_rejects_commission_above_one() {
        let request = AssessOfferRequest {
            offer: OfferProfile {
                marketing_carrier: "AA".to_string(),
                fare_basis_code: None,
                base_fare: dec!(700),
                total_fare: dec!(800),
                passenger_type: PassengerType::Adt,
                passenger_count: 1,
                is_group_booking: false,
            },
            commission_rate: Some(dec!(5)),
        };
        let service = service();
        assert!(matches!(
            service.assess(&request),
            Err(PricingError::InvalidAmount { field: "commission_rate", .. })
        ));

        let request = AssessOfferRequest {
            commission_rate: Some(dec!(0.05)),
            ..request
        };
        let assessment = service.assess(&request).unwrap();
        assert_eq!(assessment.decision.channel, Channel::Consolidator);
        assert_eq!(assessment.commission_amount, dec!(35.00));
        assert_eq!(assessment.consolidator_profit, dec!(30.00));
    }

    #[test]
    fn test_estimate_defaults_ancillary_to_zero() {
        let estimate = service()
            .estimate(&EstimateProfitRequest {
                flight_price: dec!(100),
                estimated_ancillary_revenue: None,
            })
            .unwrap();
        assert_eq!(estimate.total_profit, dec!(19.00));
    }

    #[test]
    fn test_supplier_fees_use_configured_order_fee() {
        let fees = service()
            .supplier_fees(&SupplierFeesRequest {
                total_fare: dec!(1000),
            })
            .unwrap();
        assert_eq!(fees.per_order_fee, dec!(3.00));
        assert_eq!(fees.total_cost, dec!(42.00));
    }
}
