//! Relational product store on PostgreSQL.
//!
//! Same contract as the file store, one parameterized statement per operation.

use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::storage::{ProductStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

pub const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    price NUMERIC(10, 2) NOT NULL,
    description TEXT,
    imageUrl TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

// Unquoted `imageUrl` is folded to `imageurl` by Postgres.
const COLUMNS: &str = "id, name, price, description, imageurl, created_at";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `products` table if it is missing. Never alters an existing one.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

/// `SERIAL` ids are 32-bit; anything outside that range cannot exist.
fn serial_id(id: ProductId) -> Option<i32> {
    i32::try_from(id.get()).ok()
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    let id: i32 = row.try_get("id")?;
    let created_at: Option<NaiveDateTime> = row.try_get("created_at")?;
    Ok(Product {
        id: ProductId::new(i64::from(id)),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        description: row.try_get("description")?,
        image_url: row.try_get("imageurl")?,
        created_at: created_at.map(|ts| ts.and_utc()),
    })
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM products ORDER BY id", COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            products.push(product_from_row(row)?);
        }
        Ok(products)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let Some(id) = serial_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query(&format!("SELECT {} FROM products WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn create(&self, input: NewProduct) -> Result<Product, StoreError> {
        let valid = input.validate()?;
        let row = sqlx::query(&format!(
            "INSERT INTO products (name, price, description, imageUrl)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            COLUMNS
        ))
        .bind(&valid.name)
        .bind(valid.price)
        .bind(&valid.description)
        .bind(&valid.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(product_from_row(&row)?)
    }

    async fn update_by_id(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        let Some(id) = serial_id(id) else {
            return Ok(None);
        };
        let patch = patch.normalized();
        let row = sqlx::query(&format!(
            "UPDATE products SET
                name = COALESCE($1, name),
                price = COALESCE($2, price),
                description = COALESCE($3, description),
                imageUrl = COALESCE($4, imageUrl)
             WHERE id = $5
             RETURNING {}",
            COLUMNS
        ))
        .bind(patch.name)
        .bind(patch.price)
        .bind(patch.description)
        .bind(patch.image_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let Some(id) = serial_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query(&format!("DELETE FROM products WHERE id = $1 RETURNING {}", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(product_from_row).transpose()?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
