//! Flight-price markup and channel-routing service.
//!
//! The [`pricing`] module holds the engine. This crate root wires it into an
//! axum application with shared state, health reporting and request tracing.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::AppCache;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::pricing::responses::HealthResponse;
use crate::pricing::{ConfigError, PricingService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pricing: PricingService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        crate::config::validate_quote_ttl(config.quote_ttl)?;
        let cache = AppCache::new(config.quote_ttl);
        let pricing = PricingService::new(config.pricing.clone(), cache)?;
        Ok(Self { pricing })
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.pricing.cache().stats();
    Json(HealthResponse {
        status: "ok",
        quotes_cached: stats.quotes_size,
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}
