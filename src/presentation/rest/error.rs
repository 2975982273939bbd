use crate::domain::{MarketError, StateError, ValidationError};
use crate::presentation::rest::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status: StatusCode::CONFLICT,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            code: "INTERNAL",
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_parameter(param: &str, reason: &str) -> Self {
        Self::bad_request("INVALID_PARAMETER", format!("{}: {}", param, reason))
    }
}

/// Maps the domain error taxonomy onto HTTP statuses and stable machine
/// codes: malformed input and ineligible participants are client errors,
/// missing entities are 404s, illegal transitions are conflicts, and
/// invariant violations stay opaque 500s.
impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        let message = err.to_string();
        match err {
            MarketError::Validation(ValidationError::UnknownAsset(_)) => {
                ApiError::not_found("ASSET_NOT_FOUND", message)
            }
            MarketError::Validation(_) => ApiError::bad_request("VALIDATION", message),
            MarketError::Eligibility(_) => ApiError::bad_request("NOT_ELIGIBLE", message),
            MarketError::State(StateError::OrderNotFound(_)) => {
                ApiError::not_found("ORDER_NOT_FOUND", message)
            }
            MarketError::State(StateError::TradeNotFound(_)) => {
                ApiError::not_found("TRADE_NOT_FOUND", message)
            }
            MarketError::State(StateError::DistributionNotFound(_)) => {
                ApiError::not_found("DISTRIBUTION_NOT_FOUND", message)
            }
            MarketError::State(StateError::NotOwner(_)) => ApiError {
                code: "NOT_OWNER",
                message,
                status: StatusCode::FORBIDDEN,
            },
            MarketError::State(StateError::SelfTrade) => {
                ApiError::bad_request("SELF_TRADE", message)
            }
            MarketError::State(StateError::OrderAlreadyClosed { .. }) => {
                ApiError::conflict("ORDER_ALREADY_CLOSED", message)
            }
            MarketError::State(StateError::AlreadyTerminal { .. }) => {
                ApiError::conflict("TRADE_ALREADY_TERMINAL", message)
            }
            MarketError::State(StateError::AlreadyClaimed(_)) => {
                ApiError::conflict("ALREADY_CLAIMED", message)
            }
            MarketError::Settlement(_) => ApiError {
                code: "SETTLEMENT_FAILED",
                message,
                status: StatusCode::BAD_GATEWAY,
            },
            MarketError::Invariant(_) => ApiError::internal(message),
            MarketError::EngineUnavailable(_) => ApiError {
                code: "ENGINE_UNAVAILABLE",
                message,
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code, self.message));
        (self.status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
