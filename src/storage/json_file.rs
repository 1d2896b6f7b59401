//! Full-document JSON persistence.
//!
//! A [`JsonDocument`] is one file holding one serialized value. Every write
//! reads the whole document, mutates an in-memory copy and replaces the whole
//! file. Writers inside this process are serialized by a per-document mutex;
//! nothing protects against a second process writing the same file.

use crate::storage::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Result of a mutation closure passed to [`JsonDocument::modify`].
#[derive(Debug)]
pub enum Outcome<R> {
    /// Persist the mutated document, then return the value.
    Write(R),
    /// Nothing changed; skip the write.
    Keep(R),
}

pub struct JsonDocument<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A file that does not exist yet reads as `T::default()`.
    pub async fn read(&self) -> Result<T, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Read-modify-write under the document lock.
    ///
    /// The closure sees the current document and decides whether it must be
    /// written back. Errors from the closure abort without writing.
    pub async fn modify<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        R: Send,
        F: FnOnce(&mut T) -> Result<Outcome<R>, StoreError> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read().await?;
        match f(&mut doc)? {
            Outcome::Write(value) => {
                self.write(&doc).await?;
                Ok(value)
            }
            Outcome::Keep(value) => Ok(value),
        }
    }

    /// Replaces the file through a sibling temp file so readers never see a partial document.
    async fn write(&self, doc: &T) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
