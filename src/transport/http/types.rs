use crate::app::ShopService;
use crate::domain::ProductId;
use crate::transport::http::handlers::common::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub shop: Arc<ShopService>,
}

impl AppState {
    pub fn new(shop: ShopService) -> Self {
        Self {
            shop: Arc::new(shop),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Successful envelope. A payload that does not serialize is a 500.
    pub fn ok<T: Serialize>(data: T) -> Result<Self, ApiError> {
        Ok(Self {
            success: true,
            data: Some(serde_json::to_value(data)?),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of `POST /cart` and `POST /cart/remove`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct CartLineRequest {
    /// Product id, as a number or a numeric string.
    #[serde(default, rename = "productId", alias = "id")]
    #[schema(value_type = Option<i64>)]
    pub product_id: Option<ProductId>,
}
