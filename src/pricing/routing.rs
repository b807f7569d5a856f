//! Supply channel routing for flight offers.
//!
//! Cheap fares go to the NDC aggregator for the ancillary upsell. Fares at or
//! above the threshold go to the consolidator only when an airline commission
//! exists. Low-cost carriers and excluded fares never leave the NDC channel.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{apply_markup, commission_amount, consolidator_profit};
use super::config::{PricingConfig, RoutingThreshold};
use super::models::{OfferProfile, PassengerType};

/// Carriers sold only through the NDC aggregator
const LOW_COST_CARRIERS: &[&str] = &["NK", "F9", "G4", "WN", "B6", "VY", "FR", "U2", "W6"];

/// Passenger count from which a booking is treated as a group
const GROUP_BOOKING_MIN_PASSENGERS: u32 = 10;

/// Supply channel an offer is sourced and settled through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "NDC-AGGREGATOR")]
    NdcAggregator,
    #[serde(rename = "CONSOLIDATOR")]
    Consolidator,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::NdcAggregator => "NDC-AGGREGATOR",
            Channel::Consolidator => "CONSOLIDATOR",
        }
    }
}

/// Machine-readable reason codes. Stable across threshold changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingReason {
    #[serde(rename = "under_500_ancillary_opportunity")]
    UnderThresholdAncillaryOpportunity,
    #[serde(rename = "over_500_has_commission")]
    OverThresholdHasCommission,
    #[serde(rename = "over_500_no_commission")]
    OverThresholdNoCommission,
    LccAirline,
    FareExcluded,
}

impl RoutingReason {
    pub fn code(self) -> &'static str {
        match self {
            RoutingReason::UnderThresholdAncillaryOpportunity => "under_500_ancillary_opportunity",
            RoutingReason::OverThresholdHasCommission => "over_500_has_commission",
            RoutingReason::OverThresholdNoCommission => "over_500_no_commission",
            RoutingReason::LccAirline => "lcc_airline",
            RoutingReason::FareExcluded => "fare_excluded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub channel: Channel,
    pub reason: RoutingReason,
}

/// Why a fare cannot earn consolidator commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareExclusion {
    BasicEconomy,
    GroupBooking,
    InfantFare,
}

impl FareExclusion {
    pub fn description(self) -> &'static str {
        match self {
            FareExclusion::BasicEconomy => "Basic Economy fare (7th char B)",
            FareExclusion::GroupBooking => "Group booking (10+ passengers)",
            FareExclusion::InfantFare => "Infant fare",
        }
    }
}

/// Full routing picture for one offer, with per-channel profit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAssessment {
    pub decision: RoutingDecision,
    pub has_commission: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub commission_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<FareExclusion>,
    #[serde(with = "rust_decimal::serde::str")]
    pub ndc_profit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub consolidator_profit: Decimal,
    /// Profit of the chosen channel
    #[serde(with = "rust_decimal::serde::str")]
    pub estimated_profit: Decimal,
}

/// Pick the channel for a fare. First matching rule wins; the threshold
/// comparison is strict, so a fare equal to it is "over".
pub fn route_channel(
    total_fare: Decimal,
    has_commission: bool,
    threshold: &RoutingThreshold,
) -> RoutingDecision {
    if total_fare < threshold.price_threshold {
        RoutingDecision {
            channel: Channel::NdcAggregator,
            reason: RoutingReason::UnderThresholdAncillaryOpportunity,
        }
    } else if has_commission {
        RoutingDecision {
            channel: Channel::Consolidator,
            reason: RoutingReason::OverThresholdHasCommission,
        }
    } else {
        RoutingDecision {
            channel: Channel::NdcAggregator,
            reason: RoutingReason::OverThresholdNoCommission,
        }
    }
}

pub fn is_low_cost_carrier(airline_code: &str) -> bool {
    let code = airline_code.trim();
    LOW_COST_CARRIERS
        .iter()
        .any(|lcc| lcc.eq_ignore_ascii_case(code))
}

/// Fare rules that rule out commission regardless of contract.
pub fn check_exclusions(offer: &OfferProfile) -> Option<FareExclusion> {
    let basic_economy = offer
        .fare_basis_code
        .as_deref()
        .and_then(|code| code.chars().nth(6))
        .is_some_and(|c| c == 'B');
    if basic_economy {
        return Some(FareExclusion::BasicEconomy);
    }

    if offer.is_group_booking || offer.passenger_count >= GROUP_BOOKING_MIN_PASSENGERS {
        return Some(FareExclusion::GroupBooking);
    }

    if offer.passenger_type == PassengerType::Inf {
        return Some(FareExclusion::InfantFare);
    }

    None
}

/// Route an offer given the commission rate found for it, if any.
///
/// `commission_rate` is a fraction of the base fare (`0.05` for 5%).
pub fn assess_offer(
    offer: &OfferProfile,
    commission_rate: Option<Decimal>,
    config: &PricingConfig,
) -> ChannelAssessment {
    // NDC marks up what the customer pays; commission is paid on base fare
    let ndc_profit = apply_markup(offer.total_fare, config).net_profit;
    let no_commission_profit = -config.consolidator.flat_fee;

    let ndc_only = |reason: RoutingReason, exclusion: Option<FareExclusion>| ChannelAssessment {
        decision: RoutingDecision {
            channel: Channel::NdcAggregator,
            reason,
        },
        has_commission: false,
        commission_rate: Decimal::ZERO,
        commission_amount: Decimal::ZERO,
        exclusion,
        ndc_profit,
        consolidator_profit: no_commission_profit,
        estimated_profit: ndc_profit,
    };

    if is_low_cost_carrier(&offer.marketing_carrier) {
        return ndc_only(RoutingReason::LccAirline, None);
    }
    if let Some(exclusion) = check_exclusions(offer) {
        return ndc_only(RoutingReason::FareExcluded, Some(exclusion));
    }

    let rate = commission_rate.unwrap_or(Decimal::ZERO);
    let has_commission = rate > Decimal::ZERO;
    let decision = route_channel(offer.total_fare, has_commission, &config.routing);

    let consolidator_profit = consolidator_profit(offer.base_fare, rate, &config.consolidator);
    let estimated_profit = match decision.channel {
        Channel::Consolidator => consolidator_profit,
        Channel::NdcAggregator => ndc_profit,
    };

    ChannelAssessment {
        decision,
        has_commission,
        commission_rate: rate,
        commission_amount: commission_amount(offer.base_fare, rate),
        exclusion: None,
        ndc_profit,
        consolidator_profit,
        estimated_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn threshold() -> RoutingThreshold {
        RoutingThreshold::default()
    }

    fn offer(carrier: &str, total_fare: Decimal) -> OfferProfile {
        OfferProfile {
            marketing_carrier: carrier.to_string(),
            fare_basis_code: Some("YLXF2AU".to_string()),
            base_fare: total_fare,
            total_fare,
            passenger_type: PassengerType::Adt,
            passenger_count: 1,
            is_group_booking: false,
        }
    }

    // ==================== route_channel tests ====================

    #[test]
    fn test_route_under_threshold_ignores_commission() {
        let decision = route_channel(dec!(499), true, &threshold());
        assert_eq!(decision.channel, Channel::NdcAggregator);
        assert_eq!(decision.reason.code(), "under_500_ancillary_opportunity");

        let decision = route_channel(dec!(499.99), true, &threshold());
        assert_eq!(decision.channel, Channel::NdcAggregator);
        assert_eq!(
            decision.reason,
            RoutingReason::UnderThresholdAncillaryOpportunity
        );
    }

    #[test]
    fn test_route_over_threshold_with_commission() {
        let decision = route_channel(dec!(600), true, &threshold());
        assert_eq!(decision.channel, Channel::Consolidator);
        assert_eq!(decision.reason.code(), "over_500_has_commission");
    }

    #[test]
    fn test_route_over_threshold_without_commission() {
        let decision = route_channel(dec!(600), false, &threshold());
        assert_eq!(decision.channel, Channel::NdcAggregator);
        assert_eq!(decision.reason.code(), "over_500_no_commission");
    }

    #[test]
    fn test_route_exact_threshold_is_not_under() {
        let with = route_channel(dec!(500), true, &threshold());
        assert_eq!(with.channel, Channel::Consolidator);
        assert_eq!(with.reason, RoutingReason::OverThresholdHasCommission);

        let without = route_channel(dec!(500.00), false, &threshold());
        assert_eq!(without.channel, Channel::NdcAggregator);
        assert_eq!(without.reason, RoutingReason::OverThresholdNoCommission);
    }

    #[test]
    fn test_route_respects_configured_threshold() {
        let custom = RoutingThreshold {
            price_threshold: dec!(750),
        };
        assert_eq!(
            route_channel(dec!(600), true, &custom).channel,
            Channel::NdcAggregator
        );
        assert_eq!(
            route_channel(dec!(750), true, &custom).channel,
            Channel::Consolidator
        );
    }

    #[test]
    fn test_routing_decision_serializes_codes() {
        let decision = route_channel(dec!(600), true, &threshold());
        let json = serde_json::to_value(decision).unwrap();
        assert_eq!(json["channel"], "CONSOLIDATOR");
        assert_eq!(json["reason"], "over_500_has_commission");

        let json = serde_json::to_value(RoutingReason::LccAirline).unwrap();
        assert_eq!(json, "lcc_airline");
        assert_eq!(
            serde_json::to_value(Channel::NdcAggregator).unwrap(),
            "NDC-AGGREGATOR"
        );
    }

    // ==================== exclusions tests ====================

    #[test]
    fn test_low_cost_carrier_lookup() {
        assert!(is_low_cost_carrier("NK"));
        assert!(is_low_cost_carrier("fr"));
        assert!(!is_low_cost_carrier("AA"));
        assert!(!is_low_cost_carrier(""));
    }

    #[test]
    fn test_basic_economy_seventh_character() {
        let mut o = offer("AA", dec!(800));
        o.fare_basis_code = Some("NVAJZNB1".to_string());
        assert_eq!(check_exclusions(&o), Some(FareExclusion::BasicEconomy));

        o.fare_basis_code = Some("NVAJZB".to_string());
        assert_eq!(check_exclusions(&o), None);
    }

    #[test]
    fn test_group_and_infant_exclusions() {
        let mut o = offer("AA", dec!(800));
        o.passenger_count = 10;
        assert_eq!(check_exclusions(&o), Some(FareExclusion::GroupBooking));

        o.passenger_count = 2;
        o.is_group_booking = true;
        assert_eq!(check_exclusions(&o), Some(FareExclusion::GroupBooking));

        o.is_group_booking = false;
        o.passenger_type = PassengerType::Inf;
        assert_eq!(check_exclusions(&o), Some(FareExclusion::InfantFare));
    }

    // ==================== assess_offer tests ====================

    #[test]
    fn test_assess_prices_ndc_on_total_and_commission_on_base() {
        let mut o = offer("AA", dec!(400));
        o.base_fare = dec!(250);
        let assessment = assess_offer(&o, Some(dec!(0.10)), &PricingConfig::default());

        // 400 * 0.07 = 28 markup, minus 3; base 250 would have hit the 22 floor
        assert_eq!(assessment.ndc_profit, dec!(25.00));
        assert_eq!(assessment.commission_amount, dec!(25.00));
        assert_eq!(assessment.consolidator_profit, dec!(20.00));
        assert_eq!(assessment.decision.channel, Channel::NdcAggregator);
    }

    #[test]
    fn test_assess_commissioned_expensive_fare_goes_to_consolidator() {
        let config = PricingConfig::default();
        let assessment = assess_offer(&offer("AA", dec!(800)), Some(dec!(0.05)), &config);

        assert_eq!(assessment.decision.channel, Channel::Consolidator);
        assert!(assessment.has_commission);
        assert_eq!(assessment.commission_amount, dec!(40.00));
        assert_eq!(assessment.consolidator_profit, dec!(35.00));
        // 800 * 0.07 = 56 markup, minus 3
        assert_eq!(assessment.ndc_profit, dec!(53.00));
        assert_eq!(assessment.estimated_profit, dec!(35.00));
    }

    #[test]
    fn test_assess_cheap_fare_stays_on_ndc() {
        let config = PricingConfig::default();
        let assessment = assess_offer(&offer("DL", dec!(300)), Some(dec!(0.05)), &config);

        assert_eq!(assessment.decision.channel, Channel::NdcAggregator);
        assert_eq!(
            assessment.decision.reason,
            RoutingReason::UnderThresholdAncillaryOpportunity
        );
        assert_eq!(assessment.estimated_profit, dec!(19.00));
        assert_eq!(assessment.commission_amount, dec!(15.00));
    }

    #[test]
    fn test_assess_zero_commission_counts_as_none() {
        let config = PricingConfig::default();
        let assessment = assess_offer(&offer("UA", dec!(900)), Some(Decimal::ZERO), &config);

        assert!(!assessment.has_commission);
        assert_eq!(
            assessment.decision.reason,
            RoutingReason::OverThresholdNoCommission
        );
        assert_eq!(assessment.consolidator_profit, dec!(-5.00));
    }

    #[test]
    fn test_assess_lcc_short_circuits() {
        let config = PricingConfig::default();
        let assessment = assess_offer(&offer("WN", dec!(900)), Some(dec!(0.10)), &config);

        assert_eq!(assessment.decision.channel, Channel::NdcAggregator);
        assert_eq!(assessment.decision.reason, RoutingReason::LccAirline);
        assert!(!assessment.has_commission);
        assert_eq!(assessment.commission_amount, Decimal::ZERO);
        assert_eq!(assessment.consolidator_profit, dec!(-5.00));
    }

    #[test]
    fn test_assess_excluded_fare_reports_exclusion() {
        let config = PricingConfig::default();
        let mut o = offer("BA", dec!(1200));
        o.passenger_type = PassengerType::Inf;
        let assessment = assess_offer(&o, Some(dec!(0.07)), &config);

        assert_eq!(assessment.decision.reason, RoutingReason::FareExcluded);
        assert_eq!(assessment.exclusion, Some(FareExclusion::InfantFare));
        assert_eq!(assessment.estimated_profit, assessment.ndc_profit);
    }
}
