use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::error::CheckoutError;
use crate::AppState;

pub async fn list_tiers(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match state.tiers_repo.list_for_event(event_id).await {
        Ok(tiers) => (axum::http::StatusCode::OK, Json(tiers)).into_response(),
        Err(e) => CheckoutError::Internal(e).into_response(),
    }
}
