use crate::app::ShopError;
use crate::domain::ProductId;
use crate::storage::StoreError;
use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with, already mapped to a status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The body is not JSON at all, or not sent as JSON.
    #[error("{0}")]
    UnprocessableBody(String),

    #[error(transparent)]
    Storage(StoreError),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn product_not_found(id: ProductId) -> Self {
        Self::NotFound(format!("Product {} not found", id))
    }

    /// Well-formed JSON with a missing or mistyped field is a bad request;
    /// anything that is not JSON is unprocessable.
    pub fn from_json_rejection(err: JsonRejection, expected: &str) -> Self {
        let message = format!("Invalid JSON body: {} (expected: {})", err.body_text(), expected);
        match err {
            JsonRejection::JsonDataError(_) => Self::BadRequest(message),
            _ => Self::UnprocessableBody(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnprocessableBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::BadRequest(e.to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::ProductNotFound(id) => Self::product_not_found(id),
            ShopError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(e) => {
                error!(error = %e, "storage failure");
                "Internal storage error".to_string()
            }
            Self::Encode(e) => {
                error!(error = %e, "response encoding failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::error(message))).into_response()
    }
}

/// Normalizes a path segment to a product id.
pub fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid product id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    #[test]
    fn store_errors_map_to_status_codes() {
        let validation: ApiError = StoreError::Validation(ValidationError::MissingField("name")).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let io: ApiError = StoreError::Io {
            path: "products.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing: ApiError = ShopError::ProductNotFound(ProductId::new(4)).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Product 4 not found");
    }

    #[test]
    fn unserializable_payload_is_a_server_error() {
        let keyed_by_bytes = std::collections::BTreeMap::from([(vec![1u8], 1u8)]);

        let err = ApiResponse::ok(keyed_by_bytes).unwrap_err();

        assert!(matches!(err, ApiError::Encode(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn path_ids_must_be_integers() {
        assert_eq!(parse_product_id("12").unwrap(), ProductId::new(12));
        assert!(matches!(parse_product_id("abc"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_product_id("1.5"), Err(ApiError::BadRequest(_))));
    }
}
