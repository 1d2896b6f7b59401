//! The shop service.
//!
//! Built once at startup and shared by every request handler. It owns the
//! product and cart stores and is the only place where the two meet:
//! - adding to the cart checks the product exists first
//! - deleting a product also drops it from the cart
//! - the cart view resolves line items against the catalogue

use crate::domain::{
    Cart, CartItem, CartView, MissingProductPolicy, NewProduct, Product, ProductId, ProductPatch,
};
use crate::storage::{CartStore, ProductStore, StoreError};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ShopService {
    products: Arc<dyn ProductStore>,
    cart: Arc<dyn CartStore>,
    missing_product: MissingProductPolicy,
}

impl ShopService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        cart: Arc<dyn CartStore>,
        missing_product: MissingProductPolicy,
    ) -> Self {
        Self {
            products,
            cart,
            missing_product,
        }
    }

    pub fn missing_product_policy(&self) -> MissingProductPolicy {
        self.missing_product
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.products.ping().await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.products.fetch_all().await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.products.find_by_id(id).await
    }

    pub async fn create_product(&self, input: NewProduct) -> Result<Product, StoreError> {
        let product = self.products.create(input).await?;
        info!(id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let updated = self.products.update_by_id(id, patch).await?;
        if updated.is_some() {
            info!(%id, "product updated");
        }
        Ok(updated)
    }

    /// Deletes the product, then removes it from the cart.
    pub async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let Some(removed) = self.products.delete_by_id(id).await? else {
            return Ok(None);
        };
        info!(%id, "product deleted");
        self.cart.remove_product(id).await?;
        Ok(Some(removed))
    }

    pub async fn cart(&self) -> Result<Cart, StoreError> {
        self.cart.load().await
    }

    pub async fn add_to_cart(&self, id: ProductId) -> Result<Cart, ShopError> {
        if self.products.find_by_id(id).await?.is_none() {
            return match self.missing_product {
                MissingProductPolicy::Reject => Err(ShopError::ProductNotFound(id)),
                MissingProductPolicy::Ignore => {
                    warn!(%id, "ignoring add-to-cart for unknown product");
                    Ok(self.cart.load().await?)
                }
            };
        }
        let cart = self.cart.add_product(id).await?;
        debug!(%id, quantity = cart.quantity_of(id), "added to cart");
        Ok(cart)
    }

    pub async fn remove_from_cart(&self, id: ProductId) -> Result<Cart, StoreError> {
        self.cart.remove_product(id).await
    }

    /// Cart lines merged with their product. Lines whose product is gone are dropped.
    pub async fn cart_with_details(&self) -> Result<CartView, StoreError> {
        let cart = self.cart.load().await?;
        let mut items = Vec::with_capacity(cart.products.len());
        for line in cart.products {
            match self.products.find_by_id(line.product_id).await? {
                Some(product) => items.push(CartItem {
                    product,
                    quantity: line.quantity,
                }),
                None => debug!(id = %line.product_id, "dropping cart line for deleted product"),
            }
        }
        Ok(items.into_iter().collect())
    }

    /// Inserts the demo catalogue if there are no products yet. Returns how many were created.
    pub async fn seed_demo_products(&self) -> Result<usize, StoreError> {
        if !self.products.fetch_all().await?.is_empty() {
            info!("catalogue not empty, skipping demo seed");
            return Ok(0);
        }
        let demo = [
            ("Laptop", Decimal::new(99999, 2)),
            ("Phone", Decimal::new(49999, 2)),
            ("Tablet", Decimal::new(29999, 2)),
        ];
        for (name, price) in demo {
            self.products
                .create(NewProduct {
                    description: Some("A cool item".to_string()),
                    image_url: Some("https://placehold.co/300x300".to_string()),
                    ..NewProduct::new(name, price)
                })
                .await?;
        }
        info!(count = demo.len(), "seeded demo products");
        Ok(demo.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileCartStore, FileProductStore};
    use tempfile::TempDir;

    fn service(dir: &TempDir, policy: MissingProductPolicy) -> ShopService {
        ShopService::new(
            Arc::new(FileProductStore::in_dir(dir.path())),
            Arc::new(FileCartStore::in_dir(dir.path())),
            policy,
        )
    }

    #[tokio::test]
    async fn add_unknown_product_is_rejected_by_default_policy() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Reject);

        let err = shop.add_to_cart(ProductId::new(5)).await.unwrap_err();

        assert!(matches!(err, ShopError::ProductNotFound(id) if id == ProductId::new(5)));
        assert!(shop.cart().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_unknown_product_is_a_no_op_under_ignore_policy() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Ignore);
        shop.seed_demo_products().await.unwrap();
        shop.add_to_cart(ProductId::new(1)).await.unwrap();

        let cart = shop.add_to_cart(ProductId::new(77)).await.unwrap();

        assert_eq!(cart.products.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(77)), 0);
    }

    #[tokio::test]
    async fn adding_existing_product_twice_gives_quantity_two() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Reject);
        shop.seed_demo_products().await.unwrap();

        shop.add_to_cart(ProductId::new(2)).await.unwrap();
        let cart = shop.add_to_cart(ProductId::new(2)).await.unwrap();

        assert_eq!(cart.products.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(2)), 2);
    }

    #[tokio::test]
    async fn delete_product_cascades_to_cart() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Reject);
        shop.seed_demo_products().await.unwrap();
        shop.add_to_cart(ProductId::new(1)).await.unwrap();
        shop.add_to_cart(ProductId::new(3)).await.unwrap();

        let removed = shop.delete_product(ProductId::new(1)).await.unwrap();

        assert_eq!(removed.map(|p| p.name), Some("Laptop".to_string()));
        let cart = shop.cart().await.unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 0);
        assert_eq!(cart.quantity_of(ProductId::new(3)), 1);
    }

    #[tokio::test]
    async fn cart_details_skip_products_deleted_behind_the_cart() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Reject);
        shop.seed_demo_products().await.unwrap();
        shop.add_to_cart(ProductId::new(2)).await.unwrap();
        shop.add_to_cart(ProductId::new(2)).await.unwrap();
        shop.add_to_cart(ProductId::new(3)).await.unwrap();

        // Delete straight through the store so the cart keeps a dangling line.
        FileProductStore::in_dir(dir.path())
            .delete_by_id(ProductId::new(3))
            .await
            .unwrap();

        let view = shop.cart_with_details().await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].product.name, "Phone");
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.total_price, Decimal::new(99998, 2));
        assert_eq!(shop.cart().await.unwrap().products.len(), 2);
    }

    #[tokio::test]
    async fn seed_is_skipped_when_catalogue_has_products() {
        let dir = TempDir::new().unwrap();
        let shop = service(&dir, MissingProductPolicy::Reject);

        assert_eq!(shop.seed_demo_products().await.unwrap(), 3);
        assert_eq!(shop.seed_demo_products().await.unwrap(), 0);
        assert_eq!(shop.list_products().await.unwrap().len(), 3);
    }
}
