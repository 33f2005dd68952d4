//! Whole-batch summary: totals, top videos, sentiment counts, scatter data

use crate::classify::VideoClass;
use crate::record::NormalizedRecord;
use crate::sentiment::SentimentLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many records the top-by-views ranking keeps
pub const TOP_N: usize = 5;

/// One point of the likes-vs-views chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub views: u64,
    pub likes: u64,
    pub title: String,
    pub channel: String,
    pub video_class: VideoClass,
}

/// Summary of one analysis run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub record_count: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,

    /// At most [`TOP_N`] records, most viewed first, ties in input order
    pub top_by_views: Vec<NormalizedRecord>,

    /// Every label present (zero-filled) unless the input was empty
    pub sentiment_counts: BTreeMap<SentimentLabel, usize>,

    /// One point per record, in input order
    pub scatter: Vec<ScatterPoint>,
}

impl AnalysisSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn sentiment_count(&self, label: SentimentLabel) -> usize {
        self.sentiment_counts.get(&label).copied().unwrap_or(0)
    }
}

/// Sum a count over all records, pinned at `u64::MAX`
fn saturating_total(records: &[NormalizedRecord], count: impl Fn(&NormalizedRecord) -> u64) -> u64 {
    records.iter().fold(0u64, |acc, r| acc.saturating_add(count(r)))
}

/// Aggregate the filtered records of one batch. Empty input gives an
/// all-zero summary.
pub fn aggregate(records: &[NormalizedRecord]) -> AnalysisSummary {
    if records.is_empty() {
        return AnalysisSummary::default();
    }

    // sort_by is stable, so equal view counts keep their input order
    let mut top_by_views = records.to_vec();
    top_by_views.sort_by(|a, b| b.views.cmp(&a.views));
    top_by_views.truncate(TOP_N);

    let mut sentiment_counts: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::ALL.iter().map(|label| (*label, 0)).collect();
    for record in records {
        *sentiment_counts.entry(record.sentiment_label).or_insert(0) += 1;
    }

    let scatter = records
        .iter()
        .map(|record| ScatterPoint {
            views: record.views,
            likes: record.likes,
            title: record.title.clone(),
            channel: record.channel.clone(),
            video_class: record.video_class,
        })
        .collect();

    AnalysisSummary {
        record_count: records.len(),
        total_views: saturating_total(records, |r| r.views),
        total_likes: saturating_total(records, |r| r.likes),
        total_comments: saturating_total(records, |r| r.comments),
        top_by_views,
        sentiment_counts,
        scatter,
    }
}
