use crate::transport::http::handlers::common::ApiError;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.shop.ping().await {
        Ok(()) => Ok((StatusCode::OK, Json(ApiResponse::ok(json!({ "status": "ok" }))?)).into_response()),
        Err(e) => {
            warn!(error = %e, "health check failed");
            let body = ApiResponse {
                success: false,
                data: Some(json!({ "status": "unhealthy" })),
                error: Some("Store unreachable".to_string()),
            };
            Ok((StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response())
        }
    }
}
