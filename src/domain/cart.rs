use crate::domain::product::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// One product in the cart. Refers to the product by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The persisted cart document: `{"products": [{"id": 1, "quantity": 2}]}`.
///
/// Holds at most one line per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    #[serde(default)]
    pub products: Vec<LineItem>,
}

impl Cart {
    /// Bumps the quantity of an existing line, or appends a new line with quantity 1.
    pub fn add(&mut self, product_id: ProductId) {
        match self.products.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.products.push(LineItem {
                product_id,
                quantity: 1,
            }),
        }
    }

    /// Returns `true` if a line was removed. Removing an absent product is not an error.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|l| l.product_id != product_id);
        self.products.len() != before
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.products
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// A cart line resolved against the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The cart as shown to a client: resolved items plus the running total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
}

impl FromIterator<CartItem> for CartView {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        let items: Vec<CartItem> = iter.into_iter().collect();
        let total_price = items.iter().map(CartItem::line_total).sum();
        Self { items, total_price }
    }
}

/// What adding an unknown product to the cart does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingProductPolicy {
    /// Fail with "product not found".
    #[default]
    Reject,
    /// Leave the cart untouched and report success.
    Ignore,
}

impl FromStr for MissingProductPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown missing-product policy '{}' (expected reject|ignore)", other)),
        }
    }
}

impl fmt::Display for MissingProductPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Ignore => f.write_str("ignore"),
        }
    }
}
