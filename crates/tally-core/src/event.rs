//! Calendar events as synced from the calendar provider.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Date-time layouts accepted when a timestamp carries no offset.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A synced calendar event.
///
/// Timestamps are kept exactly as stored. Parsing happens only when a
/// duration is needed, so a malformed value never rejects the event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Provider identifier, used to skip duplicates on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Creates a timed event.
    pub fn new(
        title: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            all_day: false,
        }
    }

    /// Marks the event as all-day.
    #[must_use]
    pub const fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Parsed start time, if the stored value is readable.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_time)
    }

    /// Parsed end time, if the stored value is readable.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_time)
    }

    /// Duration in hours.
    ///
    /// Returns `NaN` when either timestamp is unreadable. Zero and negative
    /// durations are returned as computed.
    pub fn hours(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                #[allow(clippy::cast_precision_loss)]
                let ms = (end - start).num_milliseconds() as f64;
                ms / MS_PER_HOUR
            }
            _ => f64::NAN,
        }
    }
}

/// Parses a stored timestamp.
///
/// Accepts RFC 3339, an offset-less date-time (read as UTC) or a bare date
/// (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
