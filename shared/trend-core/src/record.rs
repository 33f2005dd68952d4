//! Raw provider items and the normalized records built from them

use crate::classify::{classify, VideoClass, VideoTypeFilter};
use crate::duration::{parse_duration, NOT_AVAILABLE};
use crate::sentiment::{LexiconScorer, SentimentAnalyzer, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Placeholder for a missing publish date
pub const UNKNOWN_DATE: &str = "Unknown";

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// One search result with its statistics already fetched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawVideoItem {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,

    /// ISO-8601 timestamp, `None` when the provider omitted it
    pub published_at: Option<String>,

    /// ISO-8601 duration code, `None` when the provider omitted it
    pub duration_code: Option<String>,

    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub subscriber_count: u64,
}

/// A fully derived video record, ready for aggregation and export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub subscribers: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub duration_seconds: Option<f64>,
    pub duration_readable: String,
    pub video_class: VideoClass,
    pub sentiment_polarity: f64,
    pub sentiment_label: SentimentLabel,

    /// `YYYY-MM-DD` or "Unknown"
    pub published_date: String,
    pub link: String,
}

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

/// First ten characters of the publish timestamp (the date part).
/// Only an absent timestamp becomes "Unknown".
fn published_date(published_at: Option<&str>) -> String {
    match published_at {
        Some(value) => value.chars().take(10).collect(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Builds normalized records and applies the video type filter.
///
/// Holds no per-run state; one assembler can serve any number of runs.
pub struct RecordAssembler {
    analyzer: Box<dyn SentimentAnalyzer>,
}

impl RecordAssembler {
    /// Assembler using the built-in lexicon
    pub fn new() -> Self {
        Self::with_analyzer(LexiconScorer::new())
    }

    pub fn with_analyzer<A: SentimentAnalyzer + 'static>(analyzer: A) -> Self {
        Self {
            analyzer: Box::new(analyzer),
        }
    }

    /// Derive every field of the record without filtering
    pub fn normalize(&self, raw: &RawVideoItem) -> NormalizedRecord {
        let duration = parse_duration(raw.duration_code.as_deref().unwrap_or(NOT_AVAILABLE));
        let video_class = classify(duration.seconds);
        let sentiment = self.analyzer.score(&raw.title);

        NormalizedRecord {
            video_id: raw.video_id.clone(),
            title: raw.title.clone(),
            channel: raw.channel_title.clone(),
            subscribers: raw.subscriber_count,
            views: raw.view_count,
            likes: raw.like_count,
            comments: raw.comment_count,
            duration_seconds: duration.seconds,
            duration_readable: duration.readable,
            video_class,
            sentiment_polarity: sentiment.polarity,
            sentiment_label: sentiment.label,
            published_date: published_date(raw.published_at.as_deref()),
            link: watch_url(&raw.video_id),
        }
    }

    /// The record if its class matches `filter`, otherwise `None`.
    /// Records with an unknown duration are never emitted.
    pub fn assemble(&self, raw: &RawVideoItem, filter: VideoTypeFilter) -> Option<NormalizedRecord> {
        let record = self.normalize(raw);
        filter.accepts(record.video_class).then_some(record)
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// [`RecordAssembler::assemble`] with the built-in lexicon
pub fn assemble(raw: &RawVideoItem, filter: VideoTypeFilter) -> Option<NormalizedRecord> {
    static DEFAULT: OnceLock<RecordAssembler> = OnceLock::new();
    DEFAULT.get_or_init(RecordAssembler::new).assemble(raw, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_item(duration: Option<&str>) -> RawVideoItem {
        RawVideoItem {
            video_id: "abc123XYZ_0".to_string(),
            title: "Amazing street food tour".to_string(),
            channel_title: "Food Lovers".to_string(),
            channel_id: "UC123".to_string(),
            published_at: Some("2024-03-15T10:30:00Z".to_string()),
            duration_code: duration.map(String::from),
            view_count: 1_000,
            like_count: 100,
            comment_count: 10,
            subscriber_count: 50_000,
        }
    }

    #[test]
    fn test_normalize_derives_fields() {
        let record = RecordAssembler::new().normalize(&raw_item(Some("PT4M13S")));

        assert_eq!(record.duration_seconds, Some(253.0));
        assert_eq!(record.duration_readable, "4m 13s");
        assert_eq!(record.video_class, VideoClass::Short);
        assert_eq!(record.sentiment_label, SentimentLabel::Positive);
        assert_eq!(record.published_date, "2024-03-15");
        assert_eq!(record.link, "https://www.youtube.com/watch?v=abc123XYZ_0");
        assert_eq!(record.channel, "Food Lovers");
        assert_eq!(record.subscribers, 50_000);
    }

    #[test]
    fn test_assemble_filter_match_and_mismatch() {
        let short = raw_item(Some("PT4M10S"));
        assert!(assemble(&short, VideoTypeFilter::ShortVideos).is_some());
        assert!(assemble(&short, VideoTypeFilter::FullVideos).is_none());

        let full = raw_item(Some("PT12M"));
        assert!(assemble(&full, VideoTypeFilter::FullVideos).is_some());
        assert!(assemble(&full, VideoTypeFilter::ShortVideos).is_none());
    }

    #[test]
    fn test_unknown_duration_never_emitted() {
        for duration in [None, Some("N/A"), Some("garbage")] {
            let item = raw_item(duration);
            let record = RecordAssembler::new().normalize(&item);
            assert_eq!(record.video_class, VideoClass::Unknown);
            assert_eq!(record.duration_readable, "Unknown");
            assert_eq!(record.duration_seconds, None);

            for filter in VideoTypeFilter::ALL {
                assert!(assemble(&item, filter).is_none());
            }
        }
    }

    #[test]
    fn test_missing_publish_date() {
        let mut item = raw_item(Some("PT1M"));
        item.published_at = None;
        assert_eq!(RecordAssembler::new().normalize(&item).published_date, "Unknown");

        item.published_at = Some("2024".to_string());
        assert_eq!(RecordAssembler::new().normalize(&item).published_date, "2024");

        item.published_at = Some(String::new());
        assert_eq!(RecordAssembler::new().normalize(&item).published_date, "");

        item.published_at = Some(" 2024-03-15T10:00:00Z".to_string());
        assert_eq!(RecordAssembler::new().normalize(&item).published_date, " 2024-03-1");
    }

    struct FixedPolarity(f64);

    impl SentimentAnalyzer for FixedPolarity {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_custom_analyzer() {
        let assembler = RecordAssembler::with_analyzer(FixedPolarity(-0.01));
        let record = assembler.assemble(&raw_item(Some("PT30S")), VideoTypeFilter::ShortVideos).unwrap();
        assert_eq!(record.sentiment_label, SentimentLabel::Negative);

        let assembler = RecordAssembler::with_analyzer(FixedPolarity(0.0));
        let record = assembler.normalize(&raw_item(Some("PT30S")));
        assert_eq!(record.sentiment_label, SentimentLabel::Neutral);
    }
}
