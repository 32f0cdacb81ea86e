//! 🗄️ File stores — where credential references go to become bytes.
//!
//! 🔐 A client cert can arrive two ways: as inline PEM text (easy, we just write it down),
//! or as an opaque reference like `certs/client.pem` or `a1b2c3`. References are this module's
//! problem. Hand one to a [`FileStore`] and it hands back the bytes, or an `Err` meaning
//! "the store reported failure". The adapter turns that into a `FileRetrieval` error.
//!
//! 🎭 Same casting agency as always: a trait, a couple of concrete stores, and an enum that
//! dispatches so callers never care whether the PEM lived in RAM or on disk.
//!
//! 🦆 The duck is here because every file must have one. This is law.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub mod in_mem;
pub mod local;

pub use in_mem::InMemoryFileStore;
pub use local::{LocalFileStore, LocalFileStoreConfig};

/// 📂 Resolves an opaque reference into raw bytes.
///
/// # Contract
/// - `Ok(bytes)` means success, and the bytes are the file. All of them.
/// - `Err(...)` means the store reported failure. Missing, forbidden, cursed: all the same to us.
/// - `&self` only. Stores are shared read-mostly things; no call mutates the adapter.
#[async_trait]
pub trait FileStore: std::fmt::Debug + Send + Sync {
    /// 📥 Fetch the bytes behind `reference`.
    async fn get_file(&self, reference: &str) -> Result<Vec<u8>>;
}

/// 🔧 Which store to build. Tagged in TOML as `[file_store.Local]` or `[file_store.InMemory]`.
#[derive(Debug, Deserialize, Clone)]
pub enum FileStoreConfig {
    InMemory,
    Local(LocalFileStoreConfig),
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        // -- 📁 local, rooted at the working directory. the least surprising choice.
        FileStoreConfig::Local(LocalFileStoreConfig::default())
    }
}

/// 🎭 The many faces of a file store.
#[derive(Debug, Clone)]
pub enum FileStoreBackend {
    InMemory(InMemoryFileStore),
    Local(LocalFileStore),
}

impl FileStoreBackend {
    /// 🏗️ Build the configured store.
    pub fn from_config(config: &FileStoreConfig) -> Self {
        match config {
            FileStoreConfig::InMemory => FileStoreBackend::InMemory(InMemoryFileStore::new()),
            FileStoreConfig::Local(local) => {
                FileStoreBackend::Local(LocalFileStore::new(local.clone()))
            }
        }
    }
}

#[async_trait]
impl FileStore for FileStoreBackend {
    async fn get_file(&self, reference: &str) -> Result<Vec<u8>> {
        match self {
            FileStoreBackend::InMemory(store) => store.get_file(reference).await,
            FileStoreBackend::Local(store) => store.get_file(reference).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn the_one_where_the_enum_dispatches_to_the_right_store() -> Result<()> {
        let store = InMemoryFileStore::new();
        store.insert("ref-1", b"pem bytes".to_vec()).await;
        let backend = FileStoreBackend::InMemory(store);

        assert_eq!(backend.get_file("ref-1").await?, b"pem bytes".to_vec());
        assert!(backend.get_file("ref-2").await.is_err());
        Ok(())
    }

    #[test]
    fn the_one_where_the_default_store_is_local() {
        let backend = FileStoreBackend::from_config(&FileStoreConfig::default());
        assert!(matches!(backend, FileStoreBackend::Local(_)));
    }
}
