//! YouTube Channels API types.

use serde::{Deserialize, Serialize};

/// Response structure for the `channels.list` API call.
///
/// Requests are made with a `fields` filter, so every part of the response
/// may be missing. A response without items means no channel matched.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels/list>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChannelListResponse {
    /// A list of channels that match the request criteria.
    #[serde(default)]
    pub items: Vec<Channel>,
}

impl ChannelListResponse {
    /// The id of the first returned channel, if any.
    pub fn first_id(&self) -> Option<&str> {
        self.items
            .first()
            .and_then(|channel| channel.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// A `channel` resource contains information about a YouTube channel.
///
/// Only the id is read; the rest of the resource is ignored.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Serialize, Deserialize)]
pub struct Channel {
    /// The ID that YouTube uses to uniquely identify the channel.
    pub id: Option<String>,
}
