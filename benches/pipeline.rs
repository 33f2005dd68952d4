use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;
use yt_trend_analyzer::trend_core::{
    aggregate, parse_duration, LexiconScorer, RawVideoItem, RecordAssembler, SentimentAnalyzer,
    VideoTypeFilter,
};
use yt_trend_analyzer::youtube::{FixtureData, SearchHit, VideoDetails};
use yt_trend_analyzer::{AnalysisRequest, Config, ConfigBuilder, FixtureSource, TrendAnalyzer};

const TITLES: [&str; 5] = [
    "The best budget phone you can buy right now!",
    "Why I stopped using this terrible app",
    "10 AI tools that feel like magic",
    "Unboxing the new laptop",
    "Not bad at all... but not great either",
];

fn sample_items(count: usize) -> Vec<RawVideoItem> {
    (0..count)
        .map(|i| RawVideoItem {
            video_id: format!("vid{}", i),
            title: TITLES[i % TITLES.len()].to_string(),
            channel_title: format!("Channel {}", i % 7),
            channel_id: format!("UC{}", i % 7),
            published_at: Some("2024-02-29T18:45:00Z".to_string()),
            duration_code: Some(format!("PT{}M{}S", i % 12, i % 60)),
            view_count: (i as u64 * 7_919) % 1_000_003,
            like_count: (i as u64 * 131) % 50_000,
            comment_count: i as u64 % 900,
            subscriber_count: 1_000 + i as u64,
        })
        .collect()
}

/// Benchmark duration parsing
fn bench_duration_parsing(c: &mut Criterion) {
    c.bench_function("parse_duration", |b| {
        b.iter(|| {
            for code in ["PT45S", "PT4M13S", "PT1H2M3S", "P1DT2H", "PT1.5S", "garbage"] {
                black_box(parse_duration(black_box(code)));
            }
        })
    });
}

/// Benchmark title sentiment scoring
fn bench_sentiment(c: &mut Criterion) {
    let scorer = LexiconScorer::new();
    c.bench_function("sentiment_score", |b| {
        b.iter(|| {
            for title in TITLES {
                black_box(scorer.score(black_box(title)));
            }
        })
    });
}

/// Benchmark record assembly and aggregation at the default batch size and above
fn bench_assemble_and_aggregate(c: &mut Criterion) {
    let assembler = RecordAssembler::new();

    for size in [30usize, 50, 500].iter() {
        let items = sample_items(*size);
        c.bench_function(&format!("assemble_aggregate_{}", size), |b| {
            b.iter(|| {
                let records: Vec<_> = items
                    .iter()
                    .filter_map(|item| assembler.assemble(item, VideoTypeFilter::FullVideos))
                    .collect();
                black_box(aggregate(&records))
            })
        });
    }
}

/// Benchmark a full run against an in-memory fixture with different worker counts
fn bench_analysis_run(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut data = FixtureData::default();
    for item in sample_items(50) {
        data.videos.insert(
            item.video_id.clone(),
            VideoDetails {
                duration_code: item.duration_code.clone(),
                view_count: item.view_count,
                like_count: item.like_count,
                comment_count: item.comment_count,
            },
        );
        data.channels.insert(item.channel_id.clone(), item.subscriber_count);
        data.results.push(SearchHit {
            video_id: item.video_id,
            title: item.title,
            channel_title: item.channel_title,
            channel_id: item.channel_id,
            published_at: item.published_at,
        });
    }
    let request = AnalysisRequest::new("English", "Tech", "AI Tools", VideoTypeFilter::ShortVideos);

    for workers in [1, 4, 8].iter() {
        let config = ConfigBuilder::new().with_workers(*workers).with_max_results(50).build();
        let analyzer =
            TrendAnalyzer::new(config, Arc::new(FixtureSource::new(data.clone()))).unwrap();

        c.bench_function(&format!("analysis_run_{}workers", workers), |b| {
            b.iter(|| rt.block_on(async { black_box(analyzer.analyze(&request).await) }))
        });
    }
}

/// Benchmark configuration loading and validation
fn bench_config_operations(c: &mut Criterion) {
    c.bench_function("config_validation", |b| {
        let config = Config::default();
        b.iter(|| config.validate())
    });
}

criterion_group!(
    benches,
    bench_duration_parsing,
    bench_sentiment,
    bench_assemble_and_aggregate,
    bench_analysis_run,
    bench_config_operations
);
criterion_main!(benches);
