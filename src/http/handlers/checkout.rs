use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::booking::OpenCheckoutRequest;
use crate::AppState;

pub async fn open_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OpenCheckoutRequest>,
) -> impl IntoResponse {
    let Some(user_id) = current_user(&headers) else {
        return (
            axum::http::StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "missing or invalid X-User-Id header"})),
        )
            .into_response();
    };

    match state.booking_service.open_checkout(user_id, req).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}

/// Session handling lives upstream; the authenticated buyer reaches this
/// service as a header set by the gateway in front of it.
fn current_user(headers: &HeaderMap) -> Option<i64> {
    headers.get("X-User-Id")?.to_str().ok()?.parse().ok()
}
