//! Process configuration, read from the environment at startup.
//!
//! Every setting has a compiled-in default. `FARE_ENGINE_*` variables (or a
//! `.env` file) override them. The result is validated before use.

use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::cache::MAX_QUOTE_TTL;
use crate::pricing::{ConfigError, PricingConfig};

const PREFIX: &str = "FARE_ENGINE_";

/// Default log filter when neither `FARE_ENGINE_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "fare_engine=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub quote_ttl: Duration,
    pub pricing: PricingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            quote_ttl: Duration::from_secs(15 * 60),
            pricing: PricingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment. Call [`load_dotenv`] first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary lookup of full variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(&format!("{PREFIX}{key}"));
        let mut config = Self::default();

        override_with(&get, "LISTEN_ADDR", &mut config.listen_addr)?;
        let mut ttl_secs = config.quote_ttl.as_secs();
        override_with(&get, "QUOTE_TTL_SECS", &mut ttl_secs)?;
        config.quote_ttl = Duration::from_secs(ttl_secs);
        validate_quote_ttl(config.quote_ttl)?;

        let pricing = &mut config.pricing;
        override_with(&get, "MARKUP_PERCENTAGE", &mut pricing.markup.percentage)?;
        override_with(&get, "MARKUP_MINIMUM", &mut pricing.markup.minimum_amount)?;
        override_with(&get, "MARKUP_MAXIMUM", &mut pricing.markup.maximum_amount)?;
        override_with(&get, "CURRENCY", &mut pricing.markup.currency)?;
        override_with(&get, "PER_ORDER_FEE", &mut pricing.supplier.per_order_fee)?;
        if let Some(raw) = get("VARIABLE_FEE_PCT") {
            pricing.supplier.variable_fee_pct = Some(parse_value("VARIABLE_FEE_PCT", &raw)?);
        }
        override_with(&get, "ROUTING_THRESHOLD", &mut pricing.routing.price_threshold)?;
        override_with(&get, "CONSOLIDATOR_FLAT_FEE", &mut pricing.consolidator.flat_fee)?;
        override_with(
            &get,
            "ANCILLARY_MARKUP_PCT",
            &mut pricing.ancillary.average_markup_pct,
        )?;

        config.pricing.validate()?;
        Ok(config)
    }
}

/// Quotes must live for at least a second and at most [`MAX_QUOTE_TTL`].
pub fn validate_quote_ttl(ttl: Duration) -> Result<(), ConfigError> {
    if ttl.is_zero() || ttl > MAX_QUOTE_TTL {
        return Err(ConfigError::InvalidValue {
            key: format!("{PREFIX}QUOTE_TTL_SECS"),
            message: format!(
                "{}: must be between 1 and {} seconds",
                ttl.as_secs(),
                MAX_QUOTE_TTL.as_secs()
            ),
        });
    }
    Ok(())
}

/// Merge a `.env` file into the environment, if there is one.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to read .env file: {}", e);
        }
    }
}

/// Log filter to install before the full config is loaded
pub fn log_filter_from_env() -> String {
    log_filter_from_lookup(|key| env::var(key).ok())
}

fn log_filter_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&format!("{PREFIX}LOG"))
        .or_else(|| lookup("RUST_LOG"))
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

fn override_with<T, G>(get: &G, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => {
            *slot = parse_value(key, &raw)?;
            Ok(())
        }
        None => {
            info!("{PREFIX}{key} not set, using default: {slot}");
            Ok(())
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: format!("{PREFIX}{key}"),
        message: format!("{raw:?}: {e}"),
    })
}
