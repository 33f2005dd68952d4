use trend_core::{
    aggregate, assemble, export_rows, LexiconScorer, RawVideoItem, RecordAssembler,
    SentimentAnalyzer, SentimentLabel, VideoClass, VideoTypeFilter, EXPORT_COLUMNS,
};
use tempfile::TempDir;

fn item(id: &str, title: &str, duration: &str, views: u64) -> RawVideoItem {
    RawVideoItem {
        video_id: id.to_string(),
        title: title.to_string(),
        channel_title: format!("{} channel", id),
        channel_id: format!("UC_{}", id),
        published_at: Some("2024-05-20T08:00:00Z".to_string()),
        duration_code: Some(duration.to_string()),
        view_count: views,
        like_count: views / 20,
        comment_count: views / 100,
        subscriber_count: 1_000,
    }
}

#[test]
fn test_three_minute_video_end_to_end() {
    let raw = item("short1", "Funny pranks compilation", "PT3M0S", 900);

    let record = assemble(&raw, VideoTypeFilter::ShortVideos).expect("short video should be emitted");
    assert_eq!(record.duration_seconds, Some(180.0));
    assert_eq!(record.duration_readable, "3m 0s");
    assert_eq!(record.video_class, VideoClass::Short);

    assert!(assemble(&raw, VideoTypeFilter::FullVideos).is_none());
}

#[test]
fn test_filter_mismatch_suppresses_well_formed_input() {
    let raw = item("s", "Study tips", "PT4M10S", 10);
    assert!(assemble(&raw, VideoTypeFilter::FullVideos).is_none());
}

#[test]
fn test_batch_pipeline() {
    let batch = vec![
        item("a", "Best gadgets of the year", "PT10M", 10),
        item("b", "Unboxing the new phone", "PT59M59S", 5),
        item("c", "Worst purchase ever", "PT1H5M", 5),
        item("d", "Tech news roundup", "PT20M", 20),
        item("e", "Quick review", "PT45S", 1000),
        item("f", "App tutorial", "N/A", 2000),
        item("g", "Comparison video", "P1DT2H", 1),
    ];

    let assembler = RecordAssembler::new();
    let records: Vec<_> = batch
        .iter()
        .filter_map(|raw| assembler.assemble(raw, VideoTypeFilter::FullVideos))
        .collect();

    // e is short, f has no usable duration
    assert_eq!(records.len(), 5);

    let summary = aggregate(&records);
    assert_eq!(summary.total_views, 41);

    let top: Vec<&str> = summary.top_by_views.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(top, vec!["d", "a", "b", "c", "g"]);

    assert_eq!(summary.sentiment_count(SentimentLabel::Positive), 2);
    assert_eq!(summary.sentiment_count(SentimentLabel::Negative), 1);
    assert_eq!(summary.sentiment_count(SentimentLabel::Neutral), 2);

    let long = records.iter().find(|r| r.video_id == "g").unwrap();
    assert_eq!(long.duration_readable, "26h 0m");
}

#[test]
fn test_export_rows_keep_every_derived_field() {
    let assembler = RecordAssembler::new();
    let raw = item("x", "Amazing dance cover", "PT2M5S", 4_200);
    let record = assembler.assemble(&raw, VideoTypeFilter::ShortVideos).unwrap();

    let rows = export_rows(&[record.clone()]);
    assert_eq!(rows.len(), 1);

    let pairs = rows[0].pairs();
    assert_eq!(pairs.len(), EXPORT_COLUMNS.len());
    for (column, value) in &pairs {
        assert!(!value.is_empty(), "{column} should not be empty");
    }
    assert_eq!(pairs[3].1, "4200");
    assert_eq!(pairs[6].1, "2m 5s");
    assert_eq!(pairs[7].1, "2024-05-20");
    assert_eq!(pairs[8].1, "Short Video");
    assert_eq!(pairs[9].1, record.sentiment_label.to_string());
    assert_eq!(pairs[10].1, "https://www.youtube.com/watch?v=x");
}

#[test]
fn test_lexicon_file_extends_builtin_words() {
    let temp_dir = TempDir::new().unwrap();
    let lexicon_path = temp_dir.path().join("lexicon.txt");
    std::fs::write(
        &lexicon_path,
        "# Hinglish additions\n[words]\nzabardast = 0.8\nbekaar = -0.7\n",
    )
    .unwrap();

    let scorer = LexiconScorer::from_file(&lexicon_path).unwrap();
    assert_eq!(scorer.score("Zabardast comedy").label, SentimentLabel::Positive);
    assert_eq!(scorer.score("bekaar movie").label, SentimentLabel::Negative);
    // built-in words are still there
    assert_eq!(scorer.score("great").label, SentimentLabel::Positive);

    let assembler = RecordAssembler::with_analyzer(scorer);
    let record = assembler.normalize(&item("h", "bekaar", "PT1M", 1));
    assert_eq!(record.sentiment_label, SentimentLabel::Negative);
}

#[test]
fn test_missing_lexicon_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(LexiconScorer::from_file(temp_dir.path().join("missing.txt")).is_err());
}
