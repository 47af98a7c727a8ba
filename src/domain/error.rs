use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// One taxonomy for the whole settlement pipeline. Client-correctable
/// rejections, integrity violations, race losses and infrastructure
/// failures all map to a stable code and an HTTP status in one place.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart has no line items")]
    EmptyCart,
    #[error("tier {0} appears more than once in the cart")]
    DuplicateCartLine(i64),
    #[error("tier {0} has a non-positive quantity")]
    InvalidQuantity(i64),
    #[error("cart mixes tiers with different currencies")]
    MixedCurrencyCart,
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error("ticket tier {0} does not belong to this event")]
    TierNotFound(i64),
    #[error("ticket tier {0} is not currently on sale")]
    TierInactive(i64),
    #[error("requested quantity for tier {0} exceeds the per-user cap")]
    QuantityExceedsCap(i64),
    #[error("tier {0} does not have enough tickets remaining")]
    InsufficientInventory(i64),
    #[error("payment signature verification failed")]
    PaymentVerificationFailed,
    #[error("this payment callback was already settled")]
    DuplicatePaymentCallback,
    #[error("no open order found for gateway order {0}")]
    OrderNotFound(String),
    #[error("inventory for tier {0} was exhausted after payment capture")]
    OversoldAttempt(i64),
    #[error("booking {0} not found")]
    BookingNotFound(String),
    #[error("ticket not found")]
    TicketNotFound,
    #[error("booking status transition is not allowed")]
    InvalidStatusTransition,
    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn code(&self) -> &'static str {
        match self {
            CheckoutError::EmptyCart => "EMPTY_CART",
            CheckoutError::DuplicateCartLine(_) => "DUPLICATE_CART_LINE",
            CheckoutError::InvalidQuantity(_) => "INVALID_QUANTITY",
            CheckoutError::MixedCurrencyCart => "CART_CURRENCY_MISMATCH",
            CheckoutError::EventNotFound(_) => "EVENT_NOT_FOUND",
            CheckoutError::TierNotFound(_) => "TIER_NOT_FOUND",
            CheckoutError::TierInactive(_) => "TIER_INACTIVE",
            CheckoutError::QuantityExceedsCap(_) => "QUANTITY_EXCEEDS_CAP",
            CheckoutError::InsufficientInventory(_) => "INSUFFICIENT_INVENTORY",
            CheckoutError::PaymentVerificationFailed => "PAYMENT_VERIFICATION_FAILED",
            CheckoutError::DuplicatePaymentCallback => "DUPLICATE_PAYMENT_CALLBACK",
            CheckoutError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            CheckoutError::OversoldAttempt(_) => "OVERSOLD_ATTEMPT",
            CheckoutError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
            CheckoutError::TicketNotFound => "TICKET_NOT_FOUND",
            CheckoutError::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            CheckoutError::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
            CheckoutError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CheckoutError::EmptyCart
            | CheckoutError::DuplicateCartLine(_)
            | CheckoutError::InvalidQuantity(_)
            | CheckoutError::MixedCurrencyCart
            | CheckoutError::QuantityExceedsCap(_)
            | CheckoutError::PaymentVerificationFailed => StatusCode::BAD_REQUEST,
            CheckoutError::EventNotFound(_)
            | CheckoutError::TierNotFound(_)
            | CheckoutError::BookingNotFound(_)
            | CheckoutError::TicketNotFound => StatusCode::NOT_FOUND,
            CheckoutError::TierInactive(_)
            | CheckoutError::InsufficientInventory(_)
            | CheckoutError::DuplicatePaymentCallback
            | CheckoutError::OversoldAttempt(_)
            | CheckoutError::InvalidStatusTransition => StatusCode::CONFLICT,
            CheckoutError::OrderNotFound(_) => StatusCode::GONE,
            CheckoutError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorPayload {
                code: self.code().to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (self.status(), Json(envelope)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
