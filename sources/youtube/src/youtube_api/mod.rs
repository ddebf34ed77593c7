//! YouTube Data API v3 client library, limited to what is needed to tell who is live.
//!
//! # Finding a live broadcast
//!
//! YouTube exposes no "is this channel live" call to API-key clients. Instead:
//!
//! 1. A username is mapped to a channel id with `channels.list?forUsername=`
//!    ([`YouTubeClient::channel_id_for_username`]). Ids that already start
//!    with `UC` are channel ids and skip this step.
//! 2. `search.list?eventType=live` scoped to the channel returns the broadcast
//!    currently on air, if any ([`YouTubeClient::find_live_video`]).
//! 3. The YouTube Gaming `live_stats` endpoint reports that video's concurrent
//!    viewers ([`YouTubeClient::live_viewers`]).
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_live_streams::config::Config;
//! use youtube_live_streams::youtube_api::YouTubeClient;
//!
//! # async fn example() -> eyre::Result<()> {
//! let client = YouTubeClient::new(Config::from_env()?, reqwest::Client::new());
//!
//! if let Some(live) = client.find_live_video("UC_x5XG1OV2P6uZZ5FSM9Ttw").await {
//!     let viewers = client.live_viewers(&live.video_id).await;
//!     println!("{} is live with {viewers:?} viewers", live.video_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod channels;
pub mod client;
pub mod live_stats;
pub mod search;

// Re-export main types for convenience
pub use client::YouTubeClient;

pub use channels::{Channel, ChannelListResponse};
pub use live_stats::parse_viewer_count;
pub use search::{LiveVideo, ResourceId, SearchListResponse, SearchResult, SearchResultSnippet};
