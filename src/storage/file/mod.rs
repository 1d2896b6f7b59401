//! File-backed record stores (`products.json`, `cart.json`).

pub mod cart;
pub mod products;

pub use cart::FileCartStore;
pub use products::FileProductStore;
