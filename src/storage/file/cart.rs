use crate::domain::{Cart, ProductId};
use crate::storage::{CartStore, JsonDocument, Outcome, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// The cart as a single `{"products": [...]}` document.
pub struct FileCartStore {
    doc: JsonDocument<Cart>,
}

impl FileCartStore {
    pub const FILE_NAME: &'static str = "cart.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            doc: JsonDocument::new(path),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }
}

#[async_trait]
impl CartStore for FileCartStore {
    async fn load(&self) -> Result<Cart, StoreError> {
        self.doc.read().await
    }

    async fn add_product(&self, id: ProductId) -> Result<Cart, StoreError> {
        self.doc
            .modify(move |cart| {
                cart.add(id);
                Ok(Outcome::Write(cart.clone()))
            })
            .await
    }

    async fn remove_product(&self, id: ProductId) -> Result<Cart, StoreError> {
        self.doc
            .modify(move |cart| {
                if cart.remove(id) {
                    Ok(Outcome::Write(cart.clone()))
                } else {
                    Ok(Outcome::Keep(cart.clone()))
                }
            })
            .await
    }
}
