use serde::{Deserialize, Serialize};
use std::fmt::Write;
use trend_core::{AnalysisSummary, ScatterPoint, SentimentLabel};

use crate::processing::AnalysisRun;

const TITLE_WIDTH: usize = 40;
const CHANNEL_WIDTH: usize = 20;

/// Chart offered for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ChartKind {
    /// Top videos by views
    TopViews,
    /// Likes against views for every record
    LikesVsViews,
    /// Share of each sentiment label
    SentimentDistribution,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::TopViews => "Top 5 Videos by Views",
            ChartKind::LikesVsViews => "Likes vs Views",
            ChartKind::SentimentDistribution => "Sentiment Distribution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: SentimentLabel,
    pub count: usize,
    pub percent: f64,
}

/// Chart-ready series, independent of any renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Bar { title: String, points: Vec<BarPoint> },
    Scatter { title: String, points: Vec<ScatterPoint> },
    Pie { title: String, slices: Vec<PieSlice> },
}

/// Build the series for `kind` from a summary.
/// Pie slices with a zero count are left out; the rest are sorted by count, largest first.
pub fn chart_data(summary: &AnalysisSummary, kind: ChartKind) -> ChartData {
    let title = kind.title().to_string();
    match kind {
        ChartKind::TopViews => ChartData::Bar {
            title,
            points: summary
                .top_by_views
                .iter()
                .map(|record| BarPoint {
                    label: record.title.clone(),
                    value: record.views,
                })
                .collect(),
        },
        ChartKind::LikesVsViews => ChartData::Scatter {
            title,
            points: summary.scatter.clone(),
        },
        ChartKind::SentimentDistribution => {
            let total: usize = summary.sentiment_counts.values().sum();
            let mut slices: Vec<PieSlice> = summary
                .sentiment_counts
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(label, count)| PieSlice {
                    label: *label,
                    count: *count,
                    percent: *count as f64 * 100.0 / total as f64,
                })
                .collect();
            slices.sort_by(|a, b| b.count.cmp(&a.count));
            ChartData::Pie { title, slices }
        }
    }
}

/// Format a count with thousands separators: 1234567 -> "1,234,567"
pub fn format_number(number: u64) -> String {
    let num_str = number.to_string();
    let len = num_str.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Plain-text report for the terminal
pub fn render_report(run: &AnalysisRun, chart: ChartKind) -> String {
    let mut out = String::new();
    let request = &run.request;

    let _ = writeln!(
        out,
        "📊 YouTube Trend Analysis: {} / {} / {} ({})",
        request.language, request.category, request.sub_category, request.video_type
    );

    if run.records.is_empty() {
        let _ = writeln!(out, "No videos found for the selected filters.");
        return out;
    }

    let _ = writeln!(
        out,
        "Found {} {} out of {} search results\n",
        run.records.len(),
        request.video_type.label().to_lowercase(),
        run.anomalies.search_results
    );

    let _ = writeln!(
        out,
        "{:>3}  {:<tw$}  {:<cw$}  {:>13}  {:>11}  {:>9}  {:>10}  {:<9}  {:<10}",
        "#", "Title", "Channel", "Views", "Likes", "Comments", "Duration", "Sentiment", "Published",
        tw = TITLE_WIDTH,
        cw = CHANNEL_WIDTH,
    );
    for (i, record) in run.records.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<tw$}  {:<cw$}  {:>13}  {:>11}  {:>9}  {:>10}  {:<9}  {:<10}",
            i + 1,
            truncate(&record.title, TITLE_WIDTH),
            truncate(&record.channel, CHANNEL_WIDTH),
            format_number(record.views),
            format_number(record.likes),
            format_number(record.comments),
            record.duration_readable,
            record.sentiment_label,
            record.published_date,
            tw = TITLE_WIDTH,
            cw = CHANNEL_WIDTH,
        );
    }

    let summary = &run.summary;
    let _ = writeln!(
        out,
        "\nTotals: {} views, {} likes, {} comments",
        format_number(summary.total_views),
        format_number(summary.total_likes),
        format_number(summary.total_comments)
    );

    out.push('\n');
    render_chart(&mut out, &chart_data(summary, chart));
    out
}

fn render_chart(out: &mut String, data: &ChartData) {
    match data {
        ChartData::Bar { title, points } => {
            let _ = writeln!(out, "{}", title);
            for point in points {
                let _ = writeln!(
                    out,
                    "  {:<tw$}  {:>13}",
                    truncate(&point.label, TITLE_WIDTH),
                    format_number(point.value),
                    tw = TITLE_WIDTH
                );
            }
        }
        ChartData::Scatter { title, points } => {
            let _ = writeln!(out, "{}", title);
            let _ = writeln!(out, "  {:>13}  {:>11}  {:<cw$}", "Views", "Likes", "Channel", cw = CHANNEL_WIDTH);
            for point in points {
                let _ = writeln!(
                    out,
                    "  {:>13}  {:>11}  {:<cw$}",
                    format_number(point.views),
                    format_number(point.likes),
                    truncate(&point.channel, CHANNEL_WIDTH),
                    cw = CHANNEL_WIDTH
                );
            }
        }
        ChartData::Pie { title, slices } => {
            let _ = writeln!(out, "{}", title);
            for slice in slices {
                let _ = writeln!(
                    out,
                    "  {:<9}  {:>5}  {:>5.1}%",
                    slice.label.label(),
                    slice.count,
                    slice.percent
                );
            }
        }
    }
}
