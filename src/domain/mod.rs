//! Domain types for the shop: catalogue products and the shopping cart.
//!
//! Nothing in here touches storage or HTTP. Stores persist these types and
//! handlers serialize them.

pub mod cart;
pub mod product;

pub use cart::{Cart, CartItem, CartView, LineItem, MissingProductPolicy};
pub use product::{NewProduct, Product, ProductId, ProductPatch, ValidNewProduct, ValidationError};
