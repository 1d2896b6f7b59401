use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Input that cannot become a product (or a product id).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid product id: {0:?}")]
    InvalidId(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Identifier of a product.
///
/// Every id entering the crate (path segment, JSON number, JSON string) is
/// normalized to this one representation at the boundary, so ids are only ever
/// compared as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// The id following this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn from_new(id: ProductId, input: ValidNewProduct, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            description: input.description,
            image_url: input.image_url,
            created_at,
        }
    }
}

/// Create payload, as received. Call [`NewProduct::validate`] before storing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "imageURL")]
    pub image_url: Option<String>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidNewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            ..Self::default()
        }
    }

    /// Name must be non-blank and price non-zero. A zero price counts as
    /// missing, same as an absent one.
    pub fn validate(self) -> Result<ValidNewProduct, ValidationError> {
        let name = non_blank(self.name).ok_or(ValidationError::MissingField("name"))?;
        let price = self
            .price
            .filter(|p| !p.is_zero())
            .ok_or(ValidationError::MissingField("price"))?;

        Ok(ValidNewProduct {
            name,
            price,
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
        })
    }
}

/// Partial update. Fields left out, blank, or zero keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "imageURL")]
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Drops every field that would not overwrite anything.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            price: self.price.filter(|p| !p.is_zero()),
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
        }
    }

    pub fn apply(&self, product: &mut Product) {
        let patch = self.clone().normalized();
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(description) = patch.description {
            product.description = Some(description);
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = Some(image_url);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn laptop() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Laptop".to_string(),
            price: Decimal::new(99999, 2),
            description: Some("A cool item".to_string()),
            image_url: Some("https://placehold.co/300x300".to_string()),
            created_at: None,
        }
    }

    #[test]
    fn next_id_stops_at_the_top_of_the_range() {
        assert_eq!(ProductId::new(3).next(), Some(ProductId::new(4)));
        assert_eq!(ProductId::new(i64::MAX).next(), None);
    }

    #[test]
    fn product_id_accepts_numbers_and_numeric_strings() {
        let from_number: ProductId = serde_json::from_value(json!(42)).unwrap();
        let from_string: ProductId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(" 7 ".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert!(serde_json::from_value::<ProductId>(json!("abc")).is_err());
        assert_eq!(
            "abc".parse::<ProductId>(),
            Err(ValidationError::InvalidId("abc".to_string()))
        );
    }

    #[test]
    fn validate_requires_name_and_price() {
        let missing_name = NewProduct {
            name: Some("   ".to_string()),
            price: Some(Decimal::ONE),
            ..NewProduct::default()
        };
        assert_eq!(
            missing_name.validate(),
            Err(ValidationError::MissingField("name"))
        );

        let zero_price = NewProduct::new("Pen", Decimal::ZERO);
        assert_eq!(zero_price.validate(), Err(ValidationError::MissingField("price")));

        let ok = NewProduct {
            description: Some(String::new()),
            ..NewProduct::new("Pen", Decimal::new(150, 2))
        }
        .validate()
        .unwrap();
        assert_eq!(ok.name, "Pen");
        assert_eq!(ok.description, None);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut product = laptop();
        let before = product.clone();

        ProductPatch::name("X").apply(&mut product);

        assert_eq!(product.name, "X");
        assert_eq!(product.price, before.price);
        assert_eq!(product.description, before.description);
        assert_eq!(product.image_url, before.image_url);
    }

    #[test]
    fn patch_ignores_blank_and_zero_values() {
        let mut product = laptop();
        let before = product.clone();

        ProductPatch {
            name: Some(String::new()),
            price: Some(Decimal::ZERO),
            description: Some("  ".to_string()),
            image_url: None,
        }
        .apply(&mut product);

        assert_eq!(product, before);
    }

    #[test]
    fn product_json_uses_camel_case_and_accepts_legacy_image_key() {
        let value = serde_json::to_value(laptop()).unwrap();
        assert_eq!(value["imageUrl"], "https://placehold.co/300x300");
        assert_eq!(value["price"], json!(999.99));
        assert!(value.get("createdAt").is_none());

        let legacy: Product = serde_json::from_value(json!({
            "id": "3",
            "name": "Tablet",
            "price": 299.99,
            "imageURL": "https://placehold.co/300x300"
        }))
        .unwrap();
        assert_eq!(legacy.id, ProductId::new(3));
        assert_eq!(legacy.price, Decimal::new(29999, 2));
        assert!(legacy.image_url.is_some());
    }
}
