//! Flight pricing engine.
//!
//! Computes customer prices from supplier net prices and decides which supply
//! channel an offer is settled through. The calculators and router are pure;
//! the service layer adds validation, quotes and logging.

pub mod calculators;
pub mod config;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod routing;
pub mod services;

// Re-export commonly used items
pub use calculators::{apply_markup, estimate_profit, round1, round2, round_money};
pub use config::{ConfigError, Currency, PricingConfig};
pub use models::{MarkupResult, ProfitEstimate};
pub use routes::router;
pub use routing::{route_channel, Channel, RoutingDecision, RoutingReason};
pub use services::{ConfirmedQuote, PricingError, PricingService};
