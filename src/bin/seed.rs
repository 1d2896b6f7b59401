//! Prepares a store for demos: creates the `products` table when running on
//! Postgres, then inserts Laptop / Phone / Tablet if the catalogue is empty.
//!
//! Usage: cargo run --bin seed

use shop_store::infra::telemetry;
use shop_store::Config;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = Config::from_env()?;
    let shop = shop_store::build_shop(&config).await?;
    let created = shop.seed_demo_products().await?;
    let total = shop.list_products().await?.len();

    info!(created, total, store = ?config.store, "seed finished");
    Ok(())
}
