//! Pricing API route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::config::PricingConfig;
use super::models::{ProfitEstimate, SupplierFeeBreakdown};
use super::requests::{
    AssessOfferRequest, ConfirmPriceRequest, EstimateProfitRequest, RouteChannelRequest,
    SupplierFeesRequest,
};
use super::responses::QuoteResponse;
use super::routing::{ChannelAssessment, RoutingDecision};

/// Pricing routes, mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flights/confirm", post(confirm_price))
        .route("/flights/route", post(route_channel))
        .route("/flights/assess", post(assess_offer))
        .route("/flights/estimate-profit", post(estimate_profit))
        .route("/flights/supplier-fees", post(supplier_fees))
        .route("/quotes/:quote_id", get(get_quote).delete(release_quote))
        .route("/config", get(get_config))
}

/// Confirm the customer price for a supplier offer
async fn confirm_price(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ConfirmPriceRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(request) = payload?;
    let quote = state.pricing.confirm_price(&request).await?;
    Ok(Json(QuoteResponse::from(&quote)))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<Json<QuoteResponse>> {
    let quote = state.pricing.get_quote(quote_id).await?;
    Ok(Json(QuoteResponse::from(&quote)))
}

async fn release_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<Uuid>,
) -> Result<axum::http::StatusCode> {
    state.pricing.release_quote(quote_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn route_channel(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RouteChannelRequest>, JsonRejection>,
) -> Result<Json<RoutingDecision>> {
    let Json(request) = payload?;
    Ok(Json(state.pricing.route(&request)?))
}

async fn assess_offer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AssessOfferRequest>, JsonRejection>,
) -> Result<Json<ChannelAssessment>> {
    let Json(request) = payload?;
    Ok(Json(state.pricing.assess(&request)?))
}

async fn estimate_profit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EstimateProfitRequest>, JsonRejection>,
) -> Result<Json<ProfitEstimate>> {
    let Json(request) = payload?;
    Ok(Json(state.pricing.estimate(&request)?))
}

async fn supplier_fees(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SupplierFeesRequest>, JsonRejection>,
) -> Result<Json<SupplierFeeBreakdown>> {
    let Json(request) = payload?;
    Ok(Json(state.pricing.supplier_fees(&request)?))
}

async fn get_config(State(state): State<AppState>) -> Json<PricingConfig> {
    Json(state.pricing.config().clone())
}
