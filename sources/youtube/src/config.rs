//! Runtime configuration for the YouTube stream source.

use eyre::Context;

/// Base URL of the YouTube Data API v3.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Base URL of the YouTube Gaming site, which serves `live_stats` and watch pages.
pub const DEFAULT_GAMING_BASE_URL: &str = "https://gaming.youtube.com";

/// Settings shared by every request the source makes.
///
/// The API key is injected fully formed; there is no authentication flow.
#[derive(Debug, Clone)]
pub struct Config {
    /// YouTube Data API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Base URL for `channels` and `search` requests.
    pub api_base_url: String,
    /// Base URL for `live_stats` requests.
    pub gaming_base_url: String,
}

impl Config {
    /// Creates a configuration that talks to the production YouTube endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            gaming_base_url: DEFAULT_GAMING_BASE_URL.to_string(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// `YOUTUBE_API_KEY` is required. `YOUTUBE_API_BASE_URL` and
    /// `YOUTUBE_GAMING_BASE_URL` override the endpoints when set.
    pub fn from_env() -> eyre::Result<Self> {
        let api_key = std::env::var("YOUTUBE_API_KEY").context("read YOUTUBE_API_KEY")?;
        if api_key.trim().is_empty() {
            eyre::bail!("YOUTUBE_API_KEY is empty");
        }

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("YOUTUBE_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("YOUTUBE_GAMING_BASE_URL") {
            config.gaming_base_url = url;
        }
        Ok(config)
    }

    /// Points both endpoints at the given base URLs (trailing slashes are dropped).
    pub fn with_endpoints(
        mut self,
        api_base_url: impl Into<String>,
        gaming_base_url: impl Into<String>,
    ) -> Self {
        self.api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        self.gaming_base_url = gaming_base_url.into().trim_end_matches('/').to_string();
        self
    }
}
