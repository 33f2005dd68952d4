use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock, Semaphore};
use tracing::{debug, error, info, warn};
use trend_core::{
    aggregate, AnalysisSummary, LexiconScorer, NormalizedRecord, RawVideoItem, RecordAssembler,
    TrendCoreError, VideoClass, VideoTypeFilter,
};

use crate::config::{Config, Taxonomy};
use crate::youtube::{ProviderError, SearchHit, VideoSource};

/// What the user asked to analyze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub language: String,
    pub category: String,
    pub sub_category: String,
    pub video_type: VideoTypeFilter,
}

impl AnalysisRequest {
    pub fn new(
        language: impl Into<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
        video_type: VideoTypeFilter,
    ) -> Self {
        Self {
            language: language.into(),
            category: category.into(),
            sub_category: sub_category.into(),
            video_type,
        }
    }

    /// Free-text query sent to the search endpoint
    pub fn search_query(&self) -> String {
        format!("{} {}", self.language, self.sub_category)
    }

    /// Check the language, category and subcategory against the taxonomy
    pub fn validate(&self, taxonomy: &Taxonomy) -> Result<(), AnalysisError> {
        if !taxonomy.has_language(&self.language) {
            return Err(AnalysisError::InvalidRequest(format!(
                "unknown language '{}' (expected one of: {})",
                self.language,
                taxonomy.languages.join(", ")
            )));
        }

        let group = taxonomy.category(&self.category).ok_or_else(|| {
            AnalysisError::InvalidRequest(format!(
                "unknown category '{}' (expected one of: {})",
                self.category,
                taxonomy.category_names().join(", ")
            ))
        })?;

        if !group
            .subcategories
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&self.sub_category))
        {
            return Err(AnalysisError::InvalidRequest(format!(
                "'{}' is not a subcategory of '{}' (expected one of: {})",
                self.sub_category,
                group.name,
                group.subcategories.join(", ")
            )));
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] TrendCoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Items that did not become records, and why
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAnomalies {
    /// Hits returned by the search call
    pub search_results: usize,

    /// Hits with no statistics entry; skipped
    pub missing_statistics: usize,

    /// Hits whose duration could not be parsed; never emitted
    pub unknown_duration: usize,

    /// Hits with a known class other than the requested one
    pub filtered_out: usize,
}

/// Result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub request: AnalysisRequest,
    pub records: Vec<NormalizedRecord>,
    pub summary: AnalysisSummary,
    pub anomalies: RunAnomalies,
    pub generated_at: DateTime<Utc>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct AnalyzerStats {
    pub source: String,
    pub max_workers: usize,
    pub available_permits: usize,
    pub cached_channels: usize,
}

type SubscriberCache = Arc<RwLock<HashMap<String, u64>>>;

/// Runs search, per-video lookups and aggregation for one request at a time
pub struct TrendAnalyzer {
    config: Config,
    source: Arc<dyn VideoSource>,
    assembler: RecordAssembler,
    subscriber_cache: SubscriberCache,
    worker_semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl TrendAnalyzer {
    pub fn new(config: Config, source: Arc<dyn VideoSource>) -> Result<Self, AnalysisError> {
        let max_concurrent = config.analysis.max_concurrent_lookups.max(1);
        info!(
            "🔧 Initializing TrendAnalyzer with {} workers ({} source)",
            max_concurrent,
            source.name()
        );

        let scorer = match config.analysis.lexicon_file {
            Some(ref lexicon_file) if lexicon_file.exists() => LexiconScorer::from_file(lexicon_file)?,
            Some(ref lexicon_file) => {
                warn!(
                    "Lexicon file not found: {}, using built-in lexicon",
                    lexicon_file.display()
                );
                LexiconScorer::new()
            }
            None => LexiconScorer::new(),
        };
        debug!("📚 Sentiment lexicon: {} entries", scorer.len());

        Ok(Self {
            config,
            source,
            assembler: RecordAssembler::with_analyzer(scorer),
            subscriber_cache: Arc::new(RwLock::new(HashMap::new())),
            worker_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        })
    }

    /// Search, look up every hit, then assemble and aggregate.
    /// A provider failure anywhere aborts the whole run.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisRun, AnalysisError> {
        let start_time = Instant::now();
        request.validate(&self.config.taxonomy)?;

        let query = request.search_query();
        info!("🔍 Searching '{}' ({})", query, request.video_type);
        let hits = self
            .source
            .search(&query, self.config.youtube.max_results)
            .await?;
        info!("📹 Found {} search results", hits.len());

        let mut anomalies = RunAnomalies {
            search_results: hits.len(),
            ..Default::default()
        };

        let items = self.lookup_parallel(hits).await?;

        let mut records = Vec::new();
        for (hit_id, item) in items {
            let Some(raw) = item else {
                warn!("No statistics returned for video {}, skipping", hit_id);
                anomalies.missing_statistics += 1;
                continue;
            };

            let record = self.assembler.normalize(&raw);
            if record.video_class == VideoClass::Unknown {
                debug!("Unknown duration for video {}", record.video_id);
                anomalies.unknown_duration += 1;
            } else if !request.video_type.accepts(record.video_class) {
                anomalies.filtered_out += 1;
            } else {
                records.push(record);
            }
        }

        let summary = aggregate(&records);
        let elapsed = start_time.elapsed();

        info!(
            "✅ Analysis completed in {:.2}s: {} records ({} missing statistics, {} unknown duration, {} other type)",
            elapsed.as_secs_f64(),
            records.len(),
            anomalies.missing_statistics,
            anomalies.unknown_duration,
            anomalies.filtered_out
        );

        Ok(AnalysisRun {
            request: request.clone(),
            records,
            summary,
            anomalies,
            generated_at: Utc::now(),
            elapsed,
        })
    }

    /// Look up statistics for every hit with bounded concurrency. Output is
    /// in search order; `None` marks a hit the provider had no statistics for.
    async fn lookup_parallel(
        &self,
        hits: Vec<SearchHit>,
    ) -> Result<Vec<(String, Option<RawVideoItem>)>, AnalysisError> {
        let total = hits.len();
        let (tx, mut rx) = mpsc::channel(self.max_concurrent);

        let mut handles = Vec::with_capacity(total);
        for (index, hit) in hits.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let cache = Arc::clone(&self.subscriber_cache);
            let semaphore = Arc::clone(&self.worker_semaphore);
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        debug!("📊 Looking up video {}/{}: {}", index + 1, total, hit.video_id);
                        lookup_hit(source.as_ref(), &cache, hit).await
                    }
                    Err(e) => Err(AnalysisError::Internal(format!("worker pool closed: {}", e))),
                };

                if tx.send((index, result)).await.is_err() {
                    debug!("Run finished before lookup {} reported", index + 1);
                }
            }));
        }

        // Drop the original sender so the channel closes with the last task
        drop(tx);

        let mut collected = Vec::with_capacity(total);
        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(item) => collected.push((index, item)),
                Err(e) => {
                    // Stop lookups still queued or in flight
                    for handle in &handles {
                        handle.abort();
                    }
                    error!("❌ Lookup {}/{} failed, aborting run: {}", index + 1, total, e);
                    return Err(e);
                }
            }
        }

        if collected.len() != total {
            return Err(AnalysisError::Internal(format!(
                "{} of {} lookups did not complete",
                total - collected.len(),
                total
            )));
        }

        collected.sort_by_key(|(index, _)| *index);
        Ok(collected.into_iter().map(|(_, item)| item).collect())
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Get analyzer statistics
    pub fn get_stats(&self) -> AnalyzerStats {
        AnalyzerStats {
            source: self.source.name().to_string(),
            max_workers: self.max_concurrent,
            available_permits: self.worker_semaphore.available_permits(),
            cached_channels: self
                .subscriber_cache
                .try_read()
                .map(|cache| cache.len())
                .unwrap_or(0),
        }
    }
}

/// Both lookups for one hit, run concurrently
async fn lookup_hit(
    source: &dyn VideoSource,
    cache: &SubscriberCache,
    hit: SearchHit,
) -> Result<(String, Option<RawVideoItem>), AnalysisError> {
    let (details, subscribers) = tokio::try_join!(
        source.video_details(&hit.video_id),
        cached_subscribers(source, cache, &hit.channel_id),
    )?;

    let video_id = hit.video_id.clone();
    Ok((video_id, details.map(|details| hit.into_raw(details, subscribers))))
}

async fn cached_subscribers(
    source: &dyn VideoSource,
    cache: &SubscriberCache,
    channel_id: &str,
) -> Result<u64, ProviderError> {
    let cached = cache.read().await.get(channel_id).copied();
    if let Some(count) = cached {
        return Ok(count);
    }

    let count = source.channel_subscribers(channel_id).await?;
    cache.write().await.insert(channel_id.to_string(), count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::youtube::{FixtureData, FixtureSource, VideoDetails};

    fn hit(id: &str, channel: &str, title: &str) -> SearchHit {
        SearchHit {
            video_id: id.to_string(),
            title: title.to_string(),
            channel_title: format!("Channel {}", channel),
            channel_id: channel.to_string(),
            published_at: Some("2024-05-01T12:00:00Z".to_string()),
        }
    }

    fn details(duration: &str, views: u64) -> VideoDetails {
        VideoDetails {
            duration_code: Some(duration.to_string()),
            view_count: views,
            like_count: views / 10,
            comment_count: 1,
        }
    }

    fn analyzer_for(data: FixtureData) -> TrendAnalyzer {
        let config = ConfigBuilder::new().with_workers(2).build();
        TrendAnalyzer::new(config, Arc::new(FixtureSource::new(data))).unwrap()
    }

    fn request(video_type: VideoTypeFilter) -> AnalysisRequest {
        AnalysisRequest::new("English", "Tech", "AI Tools", video_type)
    }

    #[test]
    fn test_search_query() {
        assert_eq!(request(VideoTypeFilter::ShortVideos).search_query(), "English AI Tools");
    }

    #[test]
    fn test_request_validation() {
        let taxonomy = Taxonomy::default();
        assert!(request(VideoTypeFilter::ShortVideos).validate(&taxonomy).is_ok());
        assert!(AnalysisRequest::new("hindi", "tech", "ai tools", VideoTypeFilter::FullVideos)
            .validate(&taxonomy)
            .is_ok());

        let bad_language = AnalysisRequest::new("French", "Tech", "AI Tools", VideoTypeFilter::ShortVideos);
        assert!(matches!(bad_language.validate(&taxonomy), Err(AnalysisError::InvalidRequest(_))));

        let wrong_group = AnalysisRequest::new("English", "Gaming", "AI Tools", VideoTypeFilter::ShortVideos);
        assert!(matches!(wrong_group.validate(&taxonomy), Err(AnalysisError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_analyzer_creation() {
        let analyzer = analyzer_for(FixtureData::default());
        let stats = analyzer.get_stats();
        assert_eq!(stats.max_workers, 2);
        assert_eq!(stats.available_permits, 2);
        assert_eq!(stats.source, "fixture");
    }

    #[tokio::test]
    async fn test_empty_search() {
        let analyzer = analyzer_for(FixtureData::default());
        let run = analyzer.analyze(&request(VideoTypeFilter::ShortVideos)).await.unwrap();

        assert!(run.records.is_empty());
        assert!(run.summary.is_empty());
        assert_eq!(run.anomalies, RunAnomalies::default());
    }

    #[tokio::test]
    async fn test_analyze_counts_anomalies() {
        let mut data = FixtureData {
            results: vec![
                hit("short", "UC1", "Great tips"),
                hit("full", "UC1", "Long talk"),
                hit("nostats", "UC2", "Gone"),
                hit("weird", "UC2", "Odd"),
            ],
            ..Default::default()
        };
        data.videos.insert("short".to_string(), details("PT45S", 1_000));
        data.videos.insert("full".to_string(), details("PT20M", 5_000));
        data.videos.insert("weird".to_string(), details("P1M", 10));
        data.channels.insert("UC1".to_string(), 1_200);

        let analyzer = analyzer_for(data);
        let run = analyzer.analyze(&request(VideoTypeFilter::ShortVideos)).await.unwrap();

        assert_eq!(run.records.len(), 1);
        assert_eq!(run.records[0].video_id, "short");
        assert_eq!(run.records[0].subscribers, 1_200);
        assert_eq!(
            run.anomalies,
            RunAnomalies {
                search_results: 4,
                missing_statistics: 1,
                unknown_duration: 1,
                filtered_out: 1,
            }
        );
        assert_eq!(run.summary.total_views, 1_000);
        assert_eq!(analyzer.get_stats().cached_channels, 2);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_search() {
        let analyzer = analyzer_for(FixtureData::default());
        let bad = AnalysisRequest::new("English", "Cooking", "Baking", VideoTypeFilter::FullVideos);
        assert!(matches!(analyzer.analyze(&bad).await, Err(AnalysisError::InvalidRequest(_))));
    }
}
