use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::AppState;

pub async fn get_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> impl IntoResponse {
    match state.booking_service.booking_details(&reference).await {
        Ok(details) => (axum::http::StatusCode::OK, Json(details)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reissue_tickets(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> impl IntoResponse {
    match state.booking_service.reissue_tickets(&reference).await {
        Ok(details) => (axum::http::StatusCode::OK, Json(details)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> impl IntoResponse {
    match state.booking_service.cancel_booking(&reference).await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({"cancelled": true, "booking_reference": reference})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
