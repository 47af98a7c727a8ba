use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::booking::RazorpayCallback;
use crate::AppState;

/// The gateway's signed callback. May arrive zero or more times; the
/// settlement pipeline turns exactly one delivery into a booking.
pub async fn razorpay_callback(
    State(state): State<AppState>,
    Json(cb): Json<RazorpayCallback>,
) -> impl IntoResponse {
    match state.booking_service.settle_callback(cb).await {
        Ok(confirmation) => (axum::http::StatusCode::OK, Json(confirmation)).into_response(),
        Err(e) => e.into_response(),
    }
}
