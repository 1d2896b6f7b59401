//! Record stores: the persistence seam between the shop service and the backends.
//!
//! Callers only see [`ProductStore`] and [`CartStore`]. "Not found" is always
//! `Ok(None)`; `Err` is reserved for storage that could not be read or written.

use crate::domain::{Cart, NewProduct, Product, ProductId, ProductPatch, ValidationError};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

pub mod file;
pub mod json_file;
pub mod postgres;

pub use file::{FileCartStore, FileProductStore};
pub use json_file::{JsonDocument, Outcome};
pub use postgres::PgProductStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {}: {}", path.display(), source)]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no product id left after {0}")]
    IdExhausted(ProductId),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// CRUD over the product catalogue.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, in store order. Empty when nothing was ever persisted.
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Validates `input`, assigns the next id and persists the new product.
    async fn create(&self, input: NewProduct) -> Result<Product, StoreError>;

    /// Overwrites only the fields present in `patch`.
    async fn update_by_id(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError>;

    /// Removes the product and hands it back so callers can cascade.
    async fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Cheap reachability check for health endpoints.
    async fn ping(&self) -> Result<(), StoreError> {
        self.fetch_all().await.map(|_| ())
    }
}

/// The single shopping cart.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self) -> Result<Cart, StoreError>;

    /// Does not check that the product exists; that is the service's job.
    async fn add_product(&self, id: ProductId) -> Result<Cart, StoreError>;

    async fn remove_product(&self, id: ProductId) -> Result<Cart, StoreError>;
}
