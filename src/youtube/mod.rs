pub mod api;
pub mod fixture;

pub use api::YouTubeDataApi;
pub use fixture::{FixtureData, FixtureSource};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use trend_core::RawVideoItem;

use crate::config::YouTubeConfig;

/// Failures talking to a video provider. Any of these aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("API key not found. Add YOUTUBE_API_KEY=YOUR_API_KEY to your environment or .env file")]
    MissingApiKey,

    #[error("YouTube API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("YouTube API rejected the API key: {0}")]
    Unauthorized(String),

    #[error("YouTube API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// One search result (snippet only, no statistics yet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Per-video content details and statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(default)]
    pub duration_code: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
}

impl SearchHit {
    /// Combine the search snippet with its looked-up statistics
    pub fn into_raw(self, details: VideoDetails, subscriber_count: u64) -> RawVideoItem {
        RawVideoItem {
            video_id: self.video_id,
            title: self.title,
            channel_title: self.channel_title,
            channel_id: self.channel_id,
            published_at: self.published_at,
            duration_code: details.duration_code,
            view_count: details.view_count,
            like_count: details.like_count,
            comment_count: details.comment_count,
            subscriber_count,
        }
    }
}

/// Trait for video search/statistics providers
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError>;

    /// `None` when the provider has no record of the video
    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError>;

    /// Missing or hidden counts come back as 0
    async fn channel_subscribers(&self, channel_id: &str) -> Result<u64, ProviderError>;

    fn name(&self) -> &str;
}

/// Create a source: the fixture file when given, otherwise the Data API
pub fn create_source(
    config: &YouTubeConfig,
    fixture: Option<&Path>,
) -> Result<Arc<dyn VideoSource>, ProviderError> {
    match fixture {
        Some(path) => Ok(Arc::new(FixtureSource::from_file(path)?)),
        None => Ok(Arc::new(YouTubeDataApi::new(config.clone())?)),
    }
}
