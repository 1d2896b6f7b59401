use crate::domain::ProductId;
use crate::transport::http::handlers::common::ApiError;
use crate::transport::http::types::{ApiResponse, AppState, CartLineRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

const EXPECTED_BODY: &str = "{\"productId\": <id>}";

fn required_product_id(request: CartLineRequest) -> Result<ProductId, ApiError> {
    request
        .product_id
        .ok_or_else(|| ApiError::BadRequest("productId is required".to_string()))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart items with product details and total", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_cart_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let view = state.shop.cart_with_details().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(view)?)).into_response())
}

#[utoipa::path(
    post,
    path = "/cart",
    request_body = CartLineRequest,
    responses(
        (status = 200, description = "Updated cart", body = ApiResponse),
        (status = 400, description = "productId missing or not an integer", body = ApiResponse),
        (status = 404, description = "No such product (reject policy)", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    request: Result<Json<CartLineRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::from_json_rejection(e, EXPECTED_BODY))?;
    let id = required_product_id(request)?;
    let cart = state.shop.add_to_cart(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(cart)?)).into_response())
}

#[utoipa::path(
    post,
    path = "/cart/remove",
    request_body = CartLineRequest,
    responses(
        (status = 200, description = "Updated cart (removing an absent product is not an error)", body = ApiResponse),
        (status = 400, description = "productId missing or not an integer", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    request: Result<Json<CartLineRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request.map_err(|e| ApiError::from_json_rejection(e, EXPECTED_BODY))?;
    let id = required_product_id(request)?;
    let cart = state.shop.remove_from_cart(id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(cart)?)).into_response())
}
