//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use tally_core::CalendarEvent;

use crate::cli::RangeArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_datetime_at(s, Utc::now())
}

fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 weeks ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Half-open start-time window. Unbounded sides are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Resolves `--start` / `--end` flags.
    pub fn from_args(args: &RangeArgs) -> anyhow::Result<Self> {
        let start = args
            .start
            .as_deref()
            .map(parse_datetime)
            .transpose()
            .context("invalid --start")?;
        let end = args
            .end
            .as_deref()
            .map(parse_datetime)
            .transpose()
            .context("invalid --end")?;
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                anyhow::bail!("--start ({start}) must be before --end ({end})");
            }
        }
        Ok(Self { start, end })
    }

    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Keeps events whose start falls in the window.
    ///
    /// With any bound set, events whose start cannot be parsed are dropped.
    pub fn filter(&self, events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
        if self.is_unbounded() {
            return events;
        }
        let before = events.len();
        let kept: Vec<_> = events
            .into_iter()
            .filter(|event| {
                event.start().is_some_and(|t| {
                    self.start.is_none_or(|s| t >= s) && self.end.is_none_or(|e| t < e)
                })
            })
            .collect();
        tracing::debug!(before, after = kept.len(), "filtered events by start time");
        kept
    }
}
