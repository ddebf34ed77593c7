//! The aggregator's stream record, and conversion of YouTube search results into it.

use crate::youtube_api::{SearchListResponse, SearchResult};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Value of [`StreamRecord::service`] for every record produced here.
pub const SERVICE: &str = "youtube";

/// A live stream, in the shape shared by every source the aggregator polls.
///
/// The underscore-prefixed fields are bookkeeping for the aggregator itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "_service")]
    pub service: String,
    /// When this stream was seen, in seconds since the epoch.
    #[serde(rename = "_addItemTime")]
    pub add_item_time: i64,
    #[serde(rename = "_createTime")]
    pub create_time: i64,
    /// The live video's id.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_isOffline")]
    pub is_offline: bool,
    /// The user id this stream was found for, as the caller gave it.
    #[serde(rename = "_channelName")]
    pub channel_name: String,

    pub viewers: u64,
    /// YouTube's search results do not say what is being played.
    pub game: String,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<Timestamp>,
    pub channel: StreamChannel,
}

/// The channel a [`StreamRecord`] is broadcast on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChannel {
    /// The channel's title.
    pub display_name: String,
    /// The channel id.
    pub name: String,
    /// The broadcast's title.
    pub status: String,
    /// Where to watch the broadcast.
    pub url: String,
}

/// Converts a search payload into stream records, using the current time.
pub fn normalize_now(
    user_id: &str,
    payload: &SearchListResponse,
    viewers: Option<u64>,
) -> Vec<StreamRecord> {
    normalize(user_id, payload, viewers, Timestamp::now().as_second())
}

/// Converts a search payload into stream records.
///
/// Only results that are live right now and carry a video id become records.
/// All records share `now` as their discovery time and preview cache buster.
pub fn normalize(
    user_id: &str,
    payload: &SearchListResponse,
    viewers: Option<u64>,
    now: i64,
) -> Vec<StreamRecord> {
    let Some(items) = payload.items.as_deref() else {
        tracing::error!(user_id, "YouTube bad response: no items to normalize");
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.is_live())
        .filter_map(|item| record_for(user_id, item, viewers, now))
        .collect()
}

fn record_for(
    user_id: &str,
    item: &SearchResult,
    viewers: Option<u64>,
    now: i64,
) -> Option<StreamRecord> {
    let video_id = item.video_id()?;
    let snippet = item.snippet.as_ref()?;

    Some(StreamRecord {
        service: SERVICE.to_string(),
        add_item_time: now,
        create_time: now,
        id: video_id.to_string(),
        is_offline: false,
        channel_name: user_id.to_string(),
        viewers: viewers.unwrap_or(0),
        game: String::new(),
        preview: with_cache_buster(
            &format!("https://i.ytimg.com/vi/{video_id}/maxresdefault_live.jpg"),
            now,
        ),
        created_at: snippet.published_at,
        channel: StreamChannel {
            display_name: snippet.channel_title.clone().unwrap_or_default(),
            name: snippet.channel_id.clone().unwrap_or_default(),
            status: snippet.title.clone().unwrap_or_default(),
            url: format!("https://gaming.youtube.com/watch?v={video_id}"),
        },
    })
}

/// Appends `_=<now>` to `url`'s query string so image caches refetch it.
fn with_cache_buster(url: &str, now: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}_={now}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload(live_broadcast_content: &str) -> SearchListResponse {
        serde_json::from_value(serde_json::json!({
            "items": [{
                "id": {"videoId": "abc"},
                "snippet": {
                    "liveBroadcastContent": live_broadcast_content,
                    "channelTitle": "T",
                    "channelId": "UCX",
                    "title": "Status"
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_live_item() {
        let streams = normalize("UCX", &payload("live"), Some(42), 1_700_000_000);

        assert_eq!(
            streams,
            vec![StreamRecord {
                service: "youtube".to_string(),
                add_item_time: 1_700_000_000,
                create_time: 1_700_000_000,
                id: "abc".to_string(),
                is_offline: false,
                channel_name: "UCX".to_string(),
                viewers: 42,
                game: String::new(),
                preview: "https://i.ytimg.com/vi/abc/maxresdefault_live.jpg?_=1700000000"
                    .to_string(),
                created_at: None,
                channel: StreamChannel {
                    display_name: "T".to_string(),
                    name: "UCX".to_string(),
                    status: "Status".to_string(),
                    url: "https://gaming.youtube.com/watch?v=abc".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_normalize_skips_offline_items() {
        assert_eq!(normalize("UCX", &payload("none"), Some(42), 1), vec![]);
        assert_eq!(normalize("UCX", &payload("upcoming"), None, 1), vec![]);
    }

    #[test]
    fn test_normalize_skips_items_without_video_id() {
        let payload: SearchListResponse = serde_json::from_value(serde_json::json!({
            "items": [
                {"id": {"kind": "youtube#channel"}, "snippet": {"liveBroadcastContent": "live"}},
                {"id": {"videoId": "def"}, "snippet": {"liveBroadcastContent": "live"}}
            ]
        }))
        .unwrap();

        let streams = normalize("someone", &payload, None, 7);
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].id, "def");
        assert_eq!(streams[0].viewers, 0);
        assert_eq!(streams[0].channel.display_name, "");
    }

    #[test]
    fn test_normalize_without_items() {
        assert_eq!(
            normalize("UCX", &SearchListResponse::default(), Some(1), 1),
            vec![]
        );
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let payload = payload("live");
        assert_eq!(
            normalize("UCX", &payload, Some(3), 99),
            normalize("UCX", &payload, Some(3), 99)
        );
    }

    #[test]
    fn test_normalize_now_shares_timestamp() {
        let streams = normalize_now("UCX", &payload("live"), None);
        let stream = &streams[0];
        assert_eq!(stream.add_item_time, stream.create_time);
        assert!(
            stream
                .preview
                .ends_with(&format!("abc/maxresdefault_live.jpg?_={}", stream.add_item_time)),
            "{}",
            stream.preview
        );
    }

    #[test]
    fn test_published_at_is_kept() {
        let payload: SearchListResponse = serde_json::from_value(serde_json::json!({
            "items": [{
                "id": {"videoId": "abc"},
                "snippet": {"liveBroadcastContent": "live", "publishedAt": "2024-05-01T12:00:00Z"}
            }]
        }))
        .unwrap();

        let streams = normalize("UCX", &payload, None, 1);
        assert_eq!(
            streams[0].created_at,
            Some("2024-05-01T12:00:00Z".parse().unwrap())
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let streams = normalize("UCX", &payload("live"), Some(42), 5);
        let json = serde_json::to_value(&streams[0]).unwrap();

        assert_eq!(json["_service"], "youtube");
        assert_eq!(json["_id"], "abc");
        assert_eq!(json["_isOffline"], false);
        assert_eq!(json["_channelName"], "UCX");
        assert_eq!(json["_addItemTime"], 5);
        assert_eq!(json["viewers"], 42);
        assert_eq!(json["channel"]["name"], "UCX");
        assert!(json.get("created_at").is_none(), "{json}");
    }

    #[test]
    fn test_with_cache_buster() {
        assert_eq!(with_cache_buster("http://x/a.jpg", 1), "http://x/a.jpg?_=1");
        assert_eq!(with_cache_buster("http://x/a.jpg?s=2", 1), "http://x/a.jpg?s=2&_=1");
    }
}
