use crate::domain::{NewProduct, ProductPatch};
use crate::transport::http::handlers::common::{parse_product_id, ApiError};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let products = state.shop.list_products().await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(products)?)).into_response())
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "The product", body = ApiResponse),
        (status = 400, description = "Id is not an integer", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&id)?;
    let product = state
        .shop
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(product)?)).into_response())
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = ApiResponse),
        (status = 400, description = "Missing or mistyped name or price", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) =
        request.map_err(|e| ApiError::from_json_rejection(e, "{\"name\": ..., \"price\": ...}"))?;
    let product = state.shop.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product)?)).into_response())
}

/// Serves both `PUT /products/{id}` and `POST /products/{id}/update`.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse),
        (status = 400, description = "Id is not an integer, or a field has the wrong type", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 422, description = "Body is not JSON", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&id)?;
    let Json(patch) =
        request.map_err(|e| ApiError::from_json_rejection(e, "{\"name\"?, \"price\"?, ...}"))?;
    let product = state
        .shop
        .update_product(id, patch)
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(product)?)).into_response())
}

/// Serves both `DELETE /products/{id}` and `POST /products/{id}/delete`.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted (and removed from the cart)", body = ApiResponse),
        (status = 400, description = "Id is not an integer", body = ApiResponse),
        (status = 404, description = "No such product", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_product_id(&id)?;
    let removed = state
        .shop
        .delete_product(id)
        .await?
        .ok_or_else(|| ApiError::product_not_found(id))?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(removed)?)).into_response())
}
