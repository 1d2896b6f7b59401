use crate::domain::{Cart, LineItem, NewProduct, Product, ProductId, ProductPatch};
use crate::transport::http::handlers::{cart, health, products};
use crate::transport::http::types::{ApiResponse, AppState, CartLineRequest};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        cart::get_cart_handler,
        cart::add_to_cart_handler,
        cart::remove_from_cart_handler
    ),
    components(schemas(
        ApiResponse,
        Product,
        ProductId,
        NewProduct,
        ProductPatch,
        Cart,
        LineItem,
        CartLineRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .put(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route("/products/:id/update", post(products::update_product_handler))
        .route("/products/:id/delete", post(products::delete_product_handler))
        .route(
            "/cart",
            get(cart::get_cart_handler).post(cart::add_to_cart_handler),
        )
        .route("/cart/remove", post(cart::remove_from_cart_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
