//! Flat rows for tabular output (CSV, tables)

use crate::record::NormalizedRecord;
use serde::{Deserialize, Serialize};

/// Column headers, in output order
pub const EXPORT_COLUMNS: [&str; 11] = [
    "Title",
    "Channel",
    "Subscribers",
    "Views",
    "Likes",
    "Comments",
    "Duration",
    "Published Date",
    "Video Type",
    "Sentiment",
    "Video Link",
];

/// One output row. Field order matches [`EXPORT_COLUMNS`], so serializing
/// with serde yields the headers in the right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Subscribers")]
    pub subscribers: u64,
    #[serde(rename = "Views")]
    pub views: u64,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "Comments")]
    pub comments: u64,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Published Date")]
    pub published_date: String,
    #[serde(rename = "Video Type")]
    pub video_type: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "Video Link")]
    pub video_link: String,
}

impl ExportRow {
    /// Cell values in column order
    pub fn values(&self) -> [String; 11] {
        [
            self.title.clone(),
            self.channel.clone(),
            self.subscribers.to_string(),
            self.views.to_string(),
            self.likes.to_string(),
            self.comments.to_string(),
            self.duration.clone(),
            self.published_date.clone(),
            self.video_type.clone(),
            self.sentiment.clone(),
            self.video_link.clone(),
        ]
    }

    /// `(column, value)` pairs in column order
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        EXPORT_COLUMNS.iter().copied().zip(self.values()).collect()
    }
}

impl From<&NormalizedRecord> for ExportRow {
    fn from(record: &NormalizedRecord) -> Self {
        Self {
            title: record.title.clone(),
            channel: record.channel.clone(),
            subscribers: record.subscribers,
            views: record.views,
            likes: record.likes,
            comments: record.comments,
            duration: record.duration_readable.clone(),
            published_date: record.published_date.clone(),
            video_type: record.video_class.label().to_string(),
            sentiment: record.sentiment_label.label().to_string(),
            video_link: record.link.clone(),
        }
    }
}

pub fn export_rows(records: &[NormalizedRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}
