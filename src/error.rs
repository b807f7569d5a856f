//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Route not found")]
    NotFound,

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] JsonRejection),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::MalformedPayload(_) => "malformed_payload",
            AppError::Pricing(PricingError::InvalidAmount { .. }) => "invalid_amount",
            AppError::Pricing(PricingError::CurrencyMismatch { .. }) => "currency_mismatch",
            AppError::Pricing(PricingError::MissingField { .. }) => "missing_field",
            AppError::Pricing(PricingError::QuoteNotFound { .. }) => "quote_not_found",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Pricing(PricingError::QuoteNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            AppError::MalformedPayload(_) | AppError::Pricing(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Pricing(PricingError::InvalidAmount { field, value, .. }) => Some(
                serde_json::json!({ "field": field, "value": value.to_string() }),
            ),
            AppError::Pricing(PricingError::CurrencyMismatch { expected, actual }) => {
                Some(serde_json::json!({ "expected": expected, "actual": actual }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("{} ({})", self, status.as_u16());

        let body = PricingErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
