pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

use std::sync::Arc;

// Convenience re-exports (keeps call-sites clean)
pub use app::{ShopError, ShopService};
pub use domain::{Cart, CartView, MissingProductPolicy, NewProduct, Product, ProductId, ProductPatch};
pub use infra::config::{Config, StoreBackend};
pub use storage::{CartStore, FileCartStore, FileProductStore, PgProductStore, ProductStore, StoreError};

/// Wires the stores selected by `config` into a [`ShopService`].
///
/// On Postgres this connects and creates the `products` table if needed. The
/// cart always lives in `<data_dir>/cart.json`.
pub async fn build_shop(config: &Config) -> anyhow::Result<ShopService> {
    let products: Arc<dyn ProductStore> = match config.store {
        StoreBackend::File => Arc::new(FileProductStore::in_dir(&config.data_dir)),
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres store"))?;
            let store = PgProductStore::connect(url).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
    };
    let cart: Arc<dyn CartStore> = Arc::new(FileCartStore::in_dir(&config.data_dir));
    Ok(ShopService::new(products, cart, config.missing_product))
}
