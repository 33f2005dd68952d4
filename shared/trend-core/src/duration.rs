//! ISO-8601 duration codes ("PT4M13S") to seconds and display strings

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Sentinel used by providers when a video has no duration
pub const NOT_AVAILABLE: &str = "N/A";

/// Display string for durations that could not be parsed
pub const UNKNOWN_DURATION: &str = "Unknown";

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_WEEK: f64 = 604_800.0;

/// Result of parsing a duration code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDuration {
    /// Total elapsed seconds, `None` when the code was unusable
    pub seconds: Option<f64>,

    /// Human readable form ("45s", "4m 13s", "1h 2m") or "Unknown"
    pub readable: String,
}

impl ParsedDuration {
    pub fn unknown() -> Self {
        Self {
            seconds: None,
            readable: UNKNOWN_DURATION.to_string(),
        }
    }

    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: Some(seconds),
            readable: format_readable(seconds),
        }
    }
}

fn duration_regex() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^P(?:(?P<years>\d+(?:[.,]\d+)?)Y)?(?:(?P<months>\d+(?:[.,]\d+)?)M)?(?:(?P<weeks>\d+(?:[.,]\d+)?)W)?(?:(?P<days>\d+(?:[.,]\d+)?)D)?(?:(?P<time>T)(?:(?P<hours>\d+(?:[.,]\d+)?)H)?(?:(?P<minutes>\d+(?:[.,]\d+)?)M)?(?:(?P<seconds>\d+(?:[.,]\d+)?)S)?)?$",
        )
        .ok()
    })
    .as_ref()
}

fn component(caps: &regex::Captures<'_>, name: &str) -> Option<f64> {
    caps.name(name)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

/// Parse an ISO-8601 duration code into total seconds.
///
/// Returns `None` for "N/A", empty or malformed input, a bare "P"/"PT",
/// and for non-zero year or month components, whose length in seconds
/// depends on a calendar anchor.
pub fn parse_seconds(code: &str) -> Option<f64> {
    let code = code.trim();
    if code.is_empty() || code == NOT_AVAILABLE {
        return None;
    }

    let caps = duration_regex()?.captures(code)?;

    let years = component(&caps, "years");
    let months = component(&caps, "months");
    let weeks = component(&caps, "weeks");
    let days = component(&caps, "days");
    let hours = component(&caps, "hours");
    let minutes = component(&caps, "minutes");
    let seconds = component(&caps, "seconds");

    let has_time_part = hours.is_some() || minutes.is_some() || seconds.is_some();
    if caps.name("time").is_some() && !has_time_part {
        return None;
    }
    if !has_time_part && [years, months, weeks, days].iter().all(Option::is_none) {
        return None;
    }
    if years.unwrap_or(0.0) > 0.0 || months.unwrap_or(0.0) > 0.0 {
        return None;
    }

    let total = weeks.unwrap_or(0.0) * SECONDS_PER_WEEK
        + days.unwrap_or(0.0) * SECONDS_PER_DAY
        + hours.unwrap_or(0.0) * SECONDS_PER_HOUR
        + minutes.unwrap_or(0.0) * SECONDS_PER_MINUTE
        + seconds.unwrap_or(0.0);

    total.is_finite().then_some(total)
}

/// Format seconds the way the results table shows them.
///
/// Under a minute: "{s}s". Under an hour: "{m}m {s}s". Otherwise
/// "{h}h {m}m" with the seconds dropped. All parts are truncated.
pub fn format_readable(seconds: f64) -> String {
    let seconds = seconds.max(0.0);

    if seconds < SECONDS_PER_MINUTE {
        format!("{}s", seconds as u64)
    } else if seconds < SECONDS_PER_HOUR {
        let mins = (seconds / SECONDS_PER_MINUTE) as u64;
        let secs = (seconds % SECONDS_PER_MINUTE) as u64;
        format!("{}m {}s", mins, secs)
    } else {
        let hrs = (seconds / SECONDS_PER_HOUR) as u64;
        let mins = ((seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u64;
        format!("{}h {}m", hrs, mins)
    }
}

/// Parse a duration code into seconds and its readable form.
///
/// Never fails: unusable input comes back as [`ParsedDuration::unknown`].
pub fn parse_duration(code: &str) -> ParsedDuration {
    match parse_seconds(code) {
        Some(seconds) => ParsedDuration::from_seconds(seconds),
        None => ParsedDuration::unknown(),
    }
}
