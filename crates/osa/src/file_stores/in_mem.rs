use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use super::FileStore;

/// 🧠 A file store that lives entirely in RAM.
///
/// Reference -> bytes, in a `HashMap` behind `Arc<Mutex<…>>` so clones share the same
/// shelf. Handy for tests and for embedding callers who already hold the PEMs somewhere
/// and just need the adapter to stop asking.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFileStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 📥 Put `data` on the shelf under `reference`. Overwrites, no questions asked.
    pub async fn insert(&self, reference: impl Into<String>, data: Vec<u8>) {
        self.files.lock().await.insert(reference.into(), data);
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn get_file(&self, reference: &str) -> Result<Vec<u8>> {
        trace!("🧠 looking up '{}' in the in-memory file store", reference);
        self.files
            .lock()
            .await
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow!("💀 No file named '{}' in the in-memory store. We checked under every key.", reference))
    }
}
