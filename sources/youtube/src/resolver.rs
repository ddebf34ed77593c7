//! Mapping user-facing identifiers to YouTube channel ids.

use crate::store::{ChannelIdMap, ChannelIdStore};
use crate::youtube_api::YouTubeClient;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// Every YouTube channel id starts with this prefix; usernames are assumed not to.
pub const CHANNEL_ID_PREFIX: &str = "UC";

/// Resolves user ids (usernames or channel ids) to channel ids.
///
/// Resolved usernames are remembered forever, both in memory and in the
/// backing [`ChannelIdStore`]. A mapping is never re-checked once known.
pub struct ChannelResolver {
    yt: YouTubeClient,
    ids: Arc<Mutex<ChannelIdMap>>,
    store: Arc<dyn ChannelIdStore>,
    /// Serializes writes to `store` so that the last write holds every mapping.
    save_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ChannelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelResolver")
            .field("yt", &self.yt)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl ChannelResolver {
    /// Creates a resolver that starts out knowing `ids`.
    pub fn new(yt: YouTubeClient, store: Arc<dyn ChannelIdStore>, ids: ChannelIdMap) -> Self {
        Self {
            yt,
            ids: Arc::new(Mutex::new(ids)),
            store,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a resolver primed with whatever `store` has saved.
    ///
    /// Failing to load is not fatal: the resolver starts with an empty cache
    /// and mappings are looked up again as needed.
    pub async fn hydrate(yt: YouTubeClient, store: Arc<dyn ChannelIdStore>) -> Self {
        let ids = match store.load().await {
            Ok(ids) => {
                tracing::debug!(count = ids.len(), "hydrated channel id cache");
                ids
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load stored channel ids");
                ChannelIdMap::new()
            }
        };
        Self::new(yt, store, ids)
    }

    /// The cached channel id for `user_id`, without any fallback.
    pub async fn cached(&self, user_id: &str) -> Option<String> {
        self.ids.lock().await.get(user_id).cloned()
    }

    /// Resolves `user_id` to a channel id.
    ///
    /// In order: the cache, then the `UC` prefix (the id is its own channel
    /// id), then a username lookup against the API. Returns `None` if the
    /// username has no channel or the lookup failed (logged).
    ///
    /// A newly looked-up id is returned before it reaches the store; the
    /// write happens in the background.
    #[instrument(skip(self), ret)]
    pub async fn resolve(&self, user_id: &str) -> Option<String> {
        if let Some(channel_id) = self.cached(user_id).await {
            return Some(channel_id);
        }

        if user_id.starts_with(CHANNEL_ID_PREFIX) {
            return Some(user_id.to_string());
        }

        match self.yt.channel_id_for_username(user_id).await {
            Ok(Some(channel_id)) => {
                self.remember(user_id, &channel_id).await;
                Some(channel_id)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(
                    user_id,
                    error = %e,
                    "YouTube get channelId by userId request error"
                );
                None
            }
        }
    }

    /// Writes the current cache to the store and waits for the write to finish.
    ///
    /// Background writes started by [`Self::resolve`] are not awaited by
    /// anything; call this before exiting to be sure every mapping is saved.
    pub async fn persist(&self) -> eyre::Result<()> {
        let _saving = self.save_lock.lock().await;
        let snapshot = self.ids.lock().await.clone();
        self.store.save(snapshot).await
    }

    /// Records a new mapping and schedules the store update.
    async fn remember(&self, user_id: &str, channel_id: &str) {
        self.ids
            .lock()
            .await
            .insert(user_id.to_string(), channel_id.to_string());

        let ids = Arc::clone(&self.ids);
        let store = Arc::clone(&self.store);
        let save_lock = Arc::clone(&self.save_lock);
        tokio::spawn(async move {
            let _saving = save_lock.lock().await;
            let snapshot = ids.lock().await.clone();
            if let Err(e) = store.save(snapshot).await {
                tracing::error!(error = %e, "could not save channel ids");
            }
        });
    }
}
