//! Persistence for the username → channel id mapping.
//!
//! Resolving a username costs an API call, and YouTube never reassigns a
//! channel id, so discovered mappings are kept across restarts. The store is
//! loaded once at startup and rewritten in full whenever a mapping is added.

use eyre::Context;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Username (or other user-facing identifier) → canonical channel id.
pub type ChannelIdMap = HashMap<String, String>;

/// The future returned by [`ChannelIdStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = eyre::Result<T>> + Send + 'a>>;

/// A key-value backend that can hold the channel id mapping.
pub trait ChannelIdStore: Send + Sync {
    /// Returns the previously saved mapping, or an empty one if nothing was saved yet.
    fn load(&self) -> StoreFuture<'_, ChannelIdMap>;

    /// Replaces the saved mapping with `ids`.
    fn save(&self, ids: ChannelIdMap) -> StoreFuture<'_, ()>;
}

/// Stores the mapping as a JSON object in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChannelIdStore for JsonFileStore {
    fn load(&self) -> StoreFuture<'_, ChannelIdMap> {
        Box::pin(async move {
            if !tokio::fs::try_exists(&self.path)
                .await
                .with_context(|| format!("check for {}", self.path.display()))?
            {
                tracing::debug!(path = %self.path.display(), "no stored channel ids yet");
                return Ok(ChannelIdMap::new());
            }

            let json = tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("read {}", self.path.display()))?;
            let ids: ChannelIdMap =
                serde_json::from_str(&json).context("parse stored channel ids")?;
            tracing::debug!(count = ids.len(), "loaded stored channel ids");
            Ok(ids)
        })
    }

    fn save(&self, ids: ChannelIdMap) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("create {}", parent.display()))?;
            }

            let json = serde_json::to_string(&ids).context("serialize channel ids")?;
            tokio::fs::write(&self.path, json)
                .await
                .with_context(|| format!("write {}", self.path.display()))?;
            tracing::trace!(count = ids.len(), "saved channel ids");
            Ok(())
        })
    }
}

/// Keeps the mapping in memory only.
///
/// Clones share the same underlying map, so a test can hand one clone to the
/// source and inspect what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ids: Arc<Mutex<ChannelIdMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `ids`.
    pub fn with_ids(ids: ChannelIdMap) -> Self {
        Self {
            ids: Arc::new(Mutex::new(ids)),
        }
    }

    /// Returns a copy of the currently saved mapping.
    pub async fn snapshot(&self) -> ChannelIdMap {
        self.ids.lock().await.clone()
    }
}

impl ChannelIdStore for MemoryStore {
    fn load(&self) -> StoreFuture<'_, ChannelIdMap> {
        Box::pin(async move { Ok(self.ids.lock().await.clone()) })
    }

    fn save(&self, ids: ChannelIdMap) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            *self.ids.lock().await = ids;
            Ok(())
        })
    }
}
