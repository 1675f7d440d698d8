use bridge_kit_core::{Error, Result};
use std::sync::Arc;
use tracing::info;

use crate::storage::KeyValueStore;

/// Every published page lives under `bridge_page_<path>`
pub const KEY_PREFIX: &str = "bridge_page_";

pub fn storage_key(path: &str) -> String {
    format!("{}{}", KEY_PREFIX, path)
}

/// Path → rendered HTML, layered over any `KeyValueStore`.
///
/// One record per path, last write wins, nothing expires.
#[derive(Clone)]
pub struct PublishStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PublishStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub async fn put(&self, path: &str, html: &str) -> Result<()> {
        self.backend.put(&storage_key(path), html).await?;
        info!(path, bytes = html.len(), "page stored");
        Ok(())
    }

    /// Stored HTML, or `Error::NotFound`
    pub async fn get(&self, path: &str) -> Result<String> {
        self.backend
            .get(&storage_key(path))
            .await?
            .ok_or_else(|| Error::not_found(path))
    }

    pub async fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.backend.get(&storage_key(path)).await?.is_some())
    }

    /// Remove a published page, `Error::NotFound` if there was none
    pub async fn delete(&self, path: &str) -> Result<()> {
        if self.backend.delete(&storage_key(path)).await? {
            info!(path, "page removed");
            Ok(())
        } else {
            Err(Error::not_found(path))
        }
    }

    /// Published paths, sorted. Keys outside the page namespace are ignored.
    pub async fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .backend
            .keys()
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX).map(str::to_string))
            .filter(|path| !path.is_empty())
            .collect())
    }
}
