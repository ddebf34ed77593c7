//! YouTube Search API types.
//!
//! Only the live-broadcast search is used: `search.list` scoped to one channel
//! with `eventType=live`, which returns the channel's current broadcast (if any)
//! as a single search result.

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// Response structure for the `search.list` API call.
///
/// `items` is `None` when the response did not carry an item list at all,
/// which is a malformed answer rather than "nothing is live".
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// A list of results that match the search criteria.
    pub items: Option<Vec<SearchResult>>,
}

impl SearchListResponse {
    /// The first video id carried by any result, scanning in order.
    pub fn first_video_id(&self) -> Option<&str> {
        self.items.as_deref()?.iter().find_map(SearchResult::video_id)
    }
}

/// A search result contains information about a YouTube resource that matches the search.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifies the resource that matched the search request.
    pub id: Option<ResourceId>,
    /// Basic details about the search result.
    pub snippet: Option<SearchResultSnippet>,
}

impl SearchResult {
    /// The matched video's id, if this result is a video.
    pub fn video_id(&self) -> Option<&str> {
        self.id
            .as_ref()?
            .video_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Whether YouTube reports the result as currently airing.
    pub fn is_live(&self) -> bool {
        self.snippet
            .as_ref()
            .and_then(|s| s.live_broadcast_content.as_deref())
            == Some(LIVE_BROADCAST_CONTENT)
    }
}

/// The `liveBroadcastContent` value of a broadcast that is on air right now.
pub const LIVE_BROADCAST_CONTENT: &str = "live";

/// The id object of a search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceId {
    /// Present when the matched resource is a video.
    #[serde(rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Basic details about a search result.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#snippet>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSnippet {
    /// The creation time of the resource.
    ///
    /// Informational only: a value that is not a valid timestamp reads as `None`
    /// rather than rejecting the whole search result.
    #[serde(
        rename = "publishedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<Timestamp>,
    /// The id of the channel that published the resource.
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    /// The title of the resource.
    pub title: Option<String>,
    /// The title of the channel that published the resource.
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    /// `live`, `upcoming` or `none`.
    #[serde(rename = "liveBroadcastContent")]
    pub live_broadcast_content: Option<String>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// A channel's current live broadcast, as found by [`crate::youtube_api::YouTubeClient::find_live_video`].
#[derive(Debug, Clone, PartialEq)]
pub struct LiveVideo {
    /// The id of the first result that carried a video id.
    pub video_id: String,
    /// The complete search response, for normalization.
    pub payload: SearchListResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_video_id_skips_non_videos() {
        let response: SearchListResponse = serde_json::from_str(
            r#"{"items":[
                {"id":{"kind":"youtube#channel","channelId":"UCX"}},
                {"id":{"kind":"youtube#video","videoId":"abc"}},
                {"id":{"kind":"youtube#video","videoId":"def"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.first_video_id(), Some("abc"));
    }

    #[test]
    fn test_missing_items_is_distinct_from_empty() {
        let missing: SearchListResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.items, None);

        let empty: SearchListResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!(empty.items, Some(vec![]));
        assert_eq!(empty.first_video_id(), None);
    }

    #[test]
    fn test_bad_published_at_keeps_result() {
        let response: SearchListResponse = serde_json::from_str(
            r#"{"items":[
                {"id":{"videoId":"a"},"snippet":{"liveBroadcastContent":"live","publishedAt":""}},
                {"id":{"videoId":"b"},"snippet":{"liveBroadcastContent":"live","publishedAt":42}},
                {"id":{"videoId":"c"},"snippet":{"liveBroadcastContent":"live","publishedAt":null}},
                {"id":{"videoId":"d"},"snippet":{"liveBroadcastContent":"live","publishedAt":"2024-05-01T12:00:00Z"}}
            ]}"#,
        )
        .unwrap();

        let published: Vec<_> = response
            .items
            .unwrap()
            .into_iter()
            .map(|item| item.snippet.unwrap().published_at)
            .collect();
        assert_eq!(
            published,
            vec![None, None, None, Some("2024-05-01T12:00:00Z".parse().unwrap())]
        );
    }

    #[test]
    fn test_is_live() {
        let result: SearchResult = serde_json::from_str(
            r#"{"id":{"videoId":"abc"},"snippet":{"liveBroadcastContent":"live"}}"#,
        )
        .unwrap();
        assert!(result.is_live());

        let result: SearchResult = serde_json::from_str(
            r#"{"id":{"videoId":"abc"},"snippet":{"liveBroadcastContent":"upcoming"}}"#,
        )
        .unwrap();
        assert!(!result.is_live());

        let result: SearchResult = serde_json::from_str(r#"{"id":{"videoId":"abc"}}"#).unwrap();
        assert!(!result.is_live());
    }
}
