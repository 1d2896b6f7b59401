use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::storage::{JsonDocument, Outcome, ProductStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Products kept as one JSON array. New ids are max-plus-one, so document
/// order is ascending id unless the file was edited by hand.
pub struct FileProductStore {
    doc: JsonDocument<Vec<Product>>,
}

impl FileProductStore {
    pub const FILE_NAME: &'static str = "products.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(path),
        }
    }

    /// Store at `<dir>/products.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }
}

fn next_id(products: &[Product]) -> Result<ProductId, StoreError> {
    match products.iter().map(|p| p.id).max() {
        None => Ok(ProductId::new(1)),
        Some(max) => max.next().ok_or(StoreError::IdExhausted(max)),
    }
}

#[async_trait]
impl ProductStore for FileProductStore {
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        self.doc.read().await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.doc.read().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    async fn create(&self, input: NewProduct) -> Result<Product, StoreError> {
        let valid = input.validate()?;
        self.doc
            .modify(move |products| {
                let product = Product::from_new(next_id(products)?, valid, Some(Utc::now()));
                products.push(product.clone());
                Ok(Outcome::Write(product))
            })
            .await
    }

    async fn update_by_id(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        self.doc
            .modify(move |products| match products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    patch.apply(product);
                    Ok(Outcome::Write(Some(product.clone())))
                }
                None => Ok(Outcome::Keep(None)),
            })
            .await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.doc
            .modify(move |products| match products.iter().position(|p| p.id == id) {
                Some(idx) => Ok(Outcome::Write(Some(products.remove(idx)))),
                None => Ok(Outcome::Keep(None)),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileProductStore) {
        let dir = TempDir::new().unwrap();
        let store = FileProductStore::in_dir(dir.path());
        (dir, store)
    }

    async fn seed_three(store: &FileProductStore) {
        for (name, cents) in [("Laptop", 99999), ("Phone", 49999), ("Tablet", 29999)] {
            store
                .create(NewProduct::new(name, Decimal::new(cents, 2)))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn fetch_all_without_document_is_empty() {
        let (_dir, store) = store();
        assert!(store.fetch_all().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn create_on_empty_store_assigns_id_one() {
        let (_dir, store) = store();

        let created = store
            .create(NewProduct::new("Laptop", Decimal::new(99999, 2)))
            .await
            .unwrap();

        assert_eq!(created.id, ProductId::new(1));
        assert_eq!(created.name, "Laptop");
        assert_eq!(created.price, Decimal::new(99999, 2));

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all, vec![created.clone()]);
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn ids_are_max_plus_one_after_deletes() {
        let (_dir, store) = store();
        seed_three(&store).await;

        store.delete_by_id(ProductId::new(2)).await.unwrap();
        let next = store
            .create(NewProduct::new("Watch", Decimal::new(19900, 2)))
            .await
            .unwrap();

        assert_eq!(next.id, ProductId::new(4));
    }

    #[tokio::test]
    async fn create_fails_once_ids_run_out() {
        let (_dir, store) = store();
        let seeded = serde_json::json!([{ "id": i64::MAX, "name": "A", "price": 1.0 }]);
        std::fs::write(store.path(), serde_json::to_vec(&seeded).unwrap()).unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let err = store
            .create(NewProduct::new("B", Decimal::new(200, 2)))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::IdExhausted(id) if id == ProductId::new(i64::MAX)));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_writing() {
        let (_dir, store) = store();

        let err = store
            .create(NewProduct {
                name: Some("Nameless price".to_string()),
                ..NewProduct::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (_dir, store) = store();
        seed_three(&store).await;
        let before = store.find_by_id(ProductId::new(2)).await.unwrap().unwrap();

        let updated = store
            .update_by_id(ProductId::new(2), ProductPatch::name("X"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "X");
        assert_eq!(updated.price, before.price);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(store.find_by_id(ProductId::new(2)).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_dir, store) = store();
        seed_three(&store).await;
        let before = store.fetch_all().await.unwrap();

        let res = store
            .update_by_id(ProductId::new(999), ProductPatch::name("X"))
            .await
            .unwrap();

        assert_eq!(res, None);
        assert_eq!(store.fetch_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_then_find_is_not_found_even_for_unknown_ids() {
        let (_dir, store) = store();
        seed_three(&store).await;

        let removed = store.delete_by_id(ProductId::new(1)).await.unwrap();
        assert_eq!(removed.map(|p| p.name), Some("Laptop".to_string()));
        assert_eq!(store.find_by_id(ProductId::new(1)).await.unwrap(), None);

        assert_eq!(store.delete_by_id(ProductId::new(1)).await.unwrap(), None);
        assert_eq!(store.delete_by_id(ProductId::new(42)).await.unwrap(), None);
        assert_eq!(store.find_by_id(ProductId::new(42)).await.unwrap(), None);
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reads_documents_with_string_ids() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join(FileProductStore::FILE_NAME),
            r#"[{"id": "7", "name": "Lamp", "price": 25.5}]"#,
        )
        .unwrap();

        let lamp = store.find_by_id(ProductId::new(7)).await.unwrap().unwrap();
        assert_eq!(lamp.price, Decimal::new(255, 1));

        let next = store
            .create(NewProduct::new("Desk", Decimal::new(120, 0)))
            .await
            .unwrap();
        assert_eq!(next.id, ProductId::new(8));
    }
}
