/// YouTube Trend Analyzer
/// 
/// Searches YouTube for a language and topic, classifies the results as short
/// or full videos, scores title sentiment and summarizes engagement.

pub mod config;
pub mod youtube;
pub mod processing;
pub mod report;
pub mod export;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, ExportFormat, Taxonomy};
pub use crate::youtube::{create_source, FixtureSource, ProviderError, VideoSource, YouTubeDataApi};
pub use crate::processing::{AnalysisError, AnalysisRequest, AnalysisRun, RunAnomalies, TrendAnalyzer};
pub use crate::report::{chart_data, render_report, ChartData, ChartKind};
pub use crate::export::{export_file_stem, export_run, write_csv, write_json};
pub use trend_core;
