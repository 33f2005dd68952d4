//! Trend Core - Classification and aggregation pipeline for video search results
//!
//! Everything in this crate is synchronous and free of I/O apart from the
//! optional lexicon file loader. Network access belongs to the caller.

pub mod duration;
pub mod classify;
pub mod sentiment;
pub mod record;
pub mod aggregate;
pub mod export;

pub use duration::{parse_duration, format_readable, ParsedDuration};
pub use classify::{classify, VideoClass, VideoTypeFilter, SHORT_VIDEO_MAX_SECONDS};
pub use sentiment::{LexiconScorer, SentimentAnalyzer, SentimentLabel, SentimentScore};
pub use record::{assemble, watch_url, NormalizedRecord, RawVideoItem, RecordAssembler};
pub use aggregate::{aggregate, AnalysisSummary, ScatterPoint, TOP_N};
pub use export::{export_rows, ExportRow, EXPORT_COLUMNS};

/// Result type for Trend Core operations
pub type Result<T> = std::result::Result<T, TrendCoreError>;

/// Error types for Trend Core operations
#[derive(thiserror::Error, Debug)]
pub enum TrendCoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon parse error on line {line}: {message}")]
    Lexicon { line: usize, message: String },

    #[error("Unknown video type filter: {0}")]
    UnknownFilter(String),
}
