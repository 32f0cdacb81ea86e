use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::FileStore;

// -- 📁 LocalFileStoreConfig — lives next to the store it configures. one store, one config, one file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LocalFileStoreConfig {
    /// 📂 Directory that references resolve against. `None` means "relative to wherever we
    /// were launched", and absolute paths are fair game too.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// 📁 LocalFileStore — references are paths, bytes come off the disk.
///
/// With a `root` configured, references are jailed under it: absolute paths and `..` are
/// refused, because "certs/../../etc/shadow" is not a client certificate, Kevin.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    config: LocalFileStoreConfig,
}

impl LocalFileStore {
    pub fn new(config: LocalFileStoreConfig) -> Self {
        Self { config }
    }

    /// 🎯 Turn a reference into the path we will actually open.
    fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let reference_path = Path::new(reference);
        let Some(root) = &self.config.root else {
            return Ok(reference_path.to_path_buf());
        };
        if reference_path.is_absolute() {
            bail!(
                "💀 Reference '{}' is absolute, but this store is rooted at '{}'. Pick a lane.",
                reference,
                root.display()
            );
        }
        if reference_path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            bail!(
                "💀 Reference '{}' tries to climb out of '{}' with '..'. Not today.",
                reference,
                root.display()
            );
        }
        Ok(root.join(reference_path))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn get_file(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.resolve(reference)?;
        debug!("📁 reading '{}' from the local file store", path.display());
        tokio::fs::read(&path).await.context(format!(
            "💀 The file '{}' could not be read. Either it isn't there, or it is and we aren't \
             allowed to look. Both are disappointing.",
            path.display()
        ))
    }
}
