//! Reports which of a list of YouTube users are live right now.
//!
//! [`YouTubeStreams`] is the entry point: construct it once with [`YouTubeStreams::init`]
//! and poll [`YouTubeStreams::get_stream_list`] with the users of interest.

use crate::config::Config;
use crate::resolver::ChannelResolver;
use crate::store::ChannelIdStore;
use crate::stream::StreamRecord;
use crate::youtube_api::YouTubeClient;
use std::sync::Arc;
use tracing::instrument;

pub mod config;
pub mod resolver;
pub mod store;
pub mod stream;
pub mod youtube_api;

/// The answer to [`YouTubeStreams::get_channel_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelName {
    /// The user id that was asked about.
    pub user_id: String,
    /// The canonical channel id, if it differs from `user_id`.
    ///
    /// `None` means the user id already is the canonical id and needs no rename.
    pub channel_id: Option<String>,
}

/// The YouTube source: an API client plus the channel id cache.
#[derive(Debug)]
pub struct YouTubeStreams {
    yt: YouTubeClient,
    resolver: ChannelResolver,
}

impl YouTubeStreams {
    /// Sets up the source and primes the channel id cache from `store`.
    ///
    /// Having nothing stored yet is fine; so is a store that fails to load,
    /// which only costs extra username lookups.
    pub async fn init(config: Config, store: Arc<dyn ChannelIdStore>) -> Self {
        let yt = YouTubeClient::new(config, reqwest::Client::new());
        let resolver = ChannelResolver::hydrate(yt.clone(), store).await;
        Self { yt, resolver }
    }

    pub fn resolver(&self) -> &ChannelResolver {
        &self.resolver
    }

    /// Returns the live streams of every user in `user_ids`.
    ///
    /// Each user is checked concurrently and independently: a user that cannot
    /// be resolved, is not live, or whose requests fail simply contributes no
    /// streams. The list comes back once every user has been checked, in the
    /// order the users were given.
    ///
    /// Returns `None` for an empty `user_ids`.
    #[instrument(skip_all, fields(users = user_ids.len()))]
    pub async fn get_stream_list<S: AsRef<str>>(
        &self,
        user_ids: &[S],
    ) -> Option<Vec<StreamRecord>> {
        if user_ids.is_empty() {
            return None;
        }

        let checks: Vec<_> = user_ids
            .iter()
            .map(|user_id| self.streams_for(user_id.as_ref()))
            .collect();
        let per_user = futures::future::join_all(checks).await;

        let streams: Vec<_> = per_user.into_iter().flatten().collect();
        tracing::debug!(live = streams.len(), "checked all users");
        Some(streams)
    }

    /// Runs the whole pipeline for one user.
    #[instrument(skip(self))]
    async fn streams_for(&self, user_id: &str) -> Vec<StreamRecord> {
        let Some(channel_id) = self.resolver.resolve(user_id).await else {
            return Vec::new();
        };

        let Some(live) = self.yt.find_live_video(&channel_id).await else {
            return Vec::new();
        };

        let viewers = self.yt.live_viewers(&live.video_id).await;
        stream::normalize_now(user_id, &live.payload, viewers)
    }

    /// Finds out whether `user_id` should be replaced by its canonical channel id.
    ///
    /// Returns `None` if `user_id` is blank, cannot be resolved, or the channel
    /// lookup fails.
    #[instrument(skip(self), ret)]
    pub async fn get_channel_name(&self, user_id: &str) -> Option<ChannelName> {
        if user_id.trim().is_empty() {
            return None;
        }

        let channel_id = self.resolver.resolve(user_id).await?;

        let canonical = match self.yt.canonical_channel_id(&channel_id).await {
            Ok(Some(canonical)) => canonical,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(
                    user_id,
                    channel_id = %channel_id,
                    error = %e,
                    "YouTube get channelId request error"
                );
                return None;
            }
        };

        Some(ChannelName {
            user_id: user_id.to_string(),
            channel_id: (canonical != user_id).then_some(canonical),
        })
    }
}
