//! Core YouTube API client functionality.

use crate::config::Config;
use crate::youtube_api::{
    channels::ChannelListResponse,
    live_stats::parse_viewer_count,
    search::{LiveVideo, SearchListResponse},
};
use eyre::Context;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::instrument;

/// Client for the public (API-key authenticated) parts of the YouTube Data API v3
/// and the YouTube Gaming `live_stats` endpoint.
///
/// The client is cheap to clone; clones share the HTTP connection pool and configuration.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    /// Endpoints and API key.
    config: Arc<Config>,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Creates a new client for the given configuration and HTTP client.
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Makes a GET request and returns the response body as text.
    ///
    /// Any failure to get a successful response, including a non-2xx status,
    /// is reported as an error. The caller decides how to parse the body.
    #[instrument(skip(self, query_params), level = tracing::Level::TRACE)]
    async fn get_text(&self, url: &str, query_params: &[(&str, &str)]) -> eyre::Result<String> {
        let response = self
            .client
            .get(url)
            .query(query_params)
            .send()
            .await
            .with_context(|| format!("send GET request to {}", url))?;

        let status_code = response.status();
        if !status_code.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(eyre::eyre!(
                "GET {} failed with status {}: {}",
                url,
                status_code,
                error_text
            ));
        }

        response
            .text()
            .await
            .with_context(|| format!("read response body from {}", url))
    }

    /// Looks up the id of the channel owned by a legacy YouTube username.
    ///
    /// Uses the `channels.list` API with `forUsername`. Returns `Ok(None)` if
    /// no channel has that username.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self), ret)]
    pub async fn channel_id_for_username(&self, username: &str) -> eyre::Result<Option<String>> {
        let url = format!("{}/channels", self.config.api_base_url);
        let query_params = [
            ("part", "snippet"),
            ("forUsername", username),
            ("maxResults", "1"),
            ("fields", "items/id"),
            ("key", self.config.api_key.as_str()),
        ];

        let body = self.get_text(&url, &query_params).await?;
        let channels: ChannelListResponse =
            serde_json::from_str(&body).context("parse YouTube channels API response as JSON")?;

        tracing::debug!(
            username,
            returned_items = channels.items.len(),
            "looked up channel by username"
        );

        Ok(channels.first_id().map(str::to_string))
    }

    /// Fetches the canonical id of a channel by its id.
    ///
    /// Uses the `channels.list` API with `id`. Returns `Ok(None)` if YouTube
    /// does not know the channel.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/channels/list>
    #[instrument(skip(self), ret)]
    pub async fn canonical_channel_id(&self, channel_id: &str) -> eyre::Result<Option<String>> {
        let url = format!("{}/channels", self.config.api_base_url);
        let query_params = [
            ("part", "snippet"),
            ("id", channel_id),
            ("maxResults", "1"),
            ("fields", "items(id,snippet)"),
            ("key", self.config.api_key.as_str()),
        ];

        let body = self.get_text(&url, &query_params).await?;
        let channels: ChannelListResponse =
            serde_json::from_str(&body).context("parse YouTube channels API response as JSON")?;

        tracing::debug!(
            channel_id,
            returned_items = channels.items.len(),
            "fetched channel by id"
        );

        Ok(channels.first_id().map(str::to_string))
    }

    /// Finds the broadcast a channel is currently airing, if any.
    ///
    /// Uses the `search.list` API restricted to the channel's live events,
    /// asking for the single most recent one. A channel that is not live is
    /// reported as `None` quietly; request failures and responses that do not
    /// look like a search result are logged and also reported as `None`.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn find_live_video(&self, channel_id: &str) -> Option<LiveVideo> {
        let url = format!("{}/search", self.config.api_base_url);
        let query_params = [
            ("part", "snippet"),
            ("channelId", channel_id),
            ("eventType", "live"),
            ("maxResults", "1"),
            ("order", "date"),
            ("safeSearch", "none"),
            ("type", "video"),
            ("fields", "items(id,snippet)"),
            ("key", self.config.api_key.as_str()),
        ];

        let body = match self.get_text(&url, &query_params).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(channel_id, error = %e, "YouTube check request error");
                return None;
            }
        };

        let payload = match serde_json::from_str::<SearchListResponse>(&body) {
            Ok(payload) if payload.items.is_some() => payload,
            Ok(_) => {
                tracing::error!(channel_id, "YouTube bad response: no items");
                return None;
            }
            Err(e) => {
                tracing::error!(channel_id, error = %e, "YouTube bad response");
                return None;
            }
        };

        if payload.items.as_ref().is_some_and(Vec::is_empty) {
            tracing::trace!(channel_id, "channel is not live");
            return None;
        }

        let Some(video_id) = payload.first_video_id().map(str::to_string) else {
            tracing::error!(channel_id, "YouTube videoId is not found");
            return None;
        };

        tracing::debug!(channel_id, video_id = %video_id, "found live broadcast");
        Some(LiveVideo { video_id, payload })
    }

    /// Fetches the current viewer count of a live video.
    ///
    /// Returns `None` if the request fails (logged) or if the endpoint does not
    /// answer with a plain number (not logged; the count is just unavailable).
    #[instrument(skip(self), ret)]
    pub async fn live_viewers(&self, video_id: &str) -> Option<u64> {
        let url = format!("{}/live_stats", self.config.gaming_base_url);
        let cache_buster = Timestamp::now().as_millisecond().to_string();
        let query_params = [("v", video_id), ("t", cache_buster.as_str())];

        match self.get_text(&url, &query_params).await {
            Ok(body) => parse_viewer_count(&body),
            Err(e) => {
                tracing::error!(video_id, error = %e, "YouTube get viewers error");
                None
            }
        }
    }
}
