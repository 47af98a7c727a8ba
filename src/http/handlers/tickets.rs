use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::error::CheckoutError;
use crate::AppState;

/// Door-staff scan endpoint. The token is the whole credential; a ticket on
/// a cancelled booking reports as not valid but still shows what it was.
pub async fn verify_ticket(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> impl IntoResponse {
    match state.tickets_repo.find_by_token(&token).await {
        Ok(Some(v)) => {
            let valid = v.booking_status == "CONFIRMED";
            (
                axum::http::StatusCode::OK,
                Json(serde_json::json!({"valid": valid, "ticket": v})),
            )
                .into_response()
        }
        Ok(None) => CheckoutError::TicketNotFound.into_response(),
        Err(e) => CheckoutError::Internal(e).into_response(),
    }
}
