//! Short/Full classification and the user-facing video type filter

use crate::TrendCoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest duration, in seconds, still counted as a short video (inclusive)
pub const SHORT_VIDEO_MAX_SECONDS: f64 = 300.0;

/// Duration class of a single video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoClass {
    Short,
    Full,
    Unknown,
}

impl VideoClass {
    /// Label used in tables and exports
    pub fn label(&self) -> &'static str {
        match self {
            VideoClass::Short => "Short Video",
            VideoClass::Full => "Full Video",
            VideoClass::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for VideoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a duration. Missing durations are `Unknown`.
pub fn classify(duration_seconds: Option<f64>) -> VideoClass {
    match duration_seconds {
        None => VideoClass::Unknown,
        Some(seconds) if seconds <= SHORT_VIDEO_MAX_SECONDS => VideoClass::Short,
        Some(_) => VideoClass::Full,
    }
}

/// Which class of videos the user asked to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoTypeFilter {
    #[serde(rename = "Short Videos")]
    ShortVideos,
    #[serde(rename = "Full Videos")]
    FullVideos,
}

impl VideoTypeFilter {
    pub const ALL: [VideoTypeFilter; 2] = [VideoTypeFilter::ShortVideos, VideoTypeFilter::FullVideos];

    pub fn label(&self) -> &'static str {
        match self {
            VideoTypeFilter::ShortVideos => "Short Videos",
            VideoTypeFilter::FullVideos => "Full Videos",
        }
    }

    /// The class a record must have to pass this filter
    pub fn target_class(&self) -> VideoClass {
        match self {
            VideoTypeFilter::ShortVideos => VideoClass::Short,
            VideoTypeFilter::FullVideos => VideoClass::Full,
        }
    }

    /// `Unknown` never matches any filter.
    pub fn accepts(&self, class: VideoClass) -> bool {
        class != VideoClass::Unknown && class == self.target_class()
    }
}

impl Default for VideoTypeFilter {
    fn default() -> Self {
        VideoTypeFilter::ShortVideos
    }
}

impl fmt::Display for VideoTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VideoTypeFilter {
    type Err = TrendCoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "short videos" | "short video" | "shorts" | "short" => Ok(VideoTypeFilter::ShortVideos),
            "full videos" | "full video" | "full" => Ok(VideoTypeFilter::FullVideos),
            _ => Err(TrendCoreError::UnknownFilter(s.to_string())),
        }
    }
}
