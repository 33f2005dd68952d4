use super::{ProviderError, SearchHit, VideoDetails, VideoSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Recorded provider data: one search result list plus the statistics the
/// per-record lookups would have returned
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    pub results: Vec<SearchHit>,

    /// video id -> details; ids missing here behave like an empty `videos.list`
    #[serde(default)]
    pub videos: HashMap<String, VideoDetails>,

    /// channel id -> subscriber count
    #[serde(default)]
    pub channels: HashMap<String, u64>,
}

/// Offline [`VideoSource`] serving a JSON fixture. Every query returns the
/// same result list, truncated to `max_results`.
pub struct FixtureSource {
    data: FixtureData,
}

impl FixtureSource {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Fixture(format!("{}: {}", path.display(), e)))?;
        let data: FixtureData = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Fixture(format!("{}: {}", path.display(), e)))?;

        info!("📼 Loaded fixture with {} results from: {}", data.results.len(), path.display());
        Ok(Self::new(data))
    }
}

#[async_trait]
impl VideoSource for FixtureSource {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, ProviderError> {
        debug!("Fixture search for '{}'", query);
        Ok(self
            .data
            .results
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<VideoDetails>, ProviderError> {
        Ok(self.data.videos.get(video_id).cloned())
    }

    async fn channel_subscribers(&self, channel_id: &str) -> Result<u64, ProviderError> {
        Ok(self.data.channels.get(channel_id).copied().unwrap_or(0))
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
