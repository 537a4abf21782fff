//! Events command for inspecting stored events.
//!
//! This module outputs events as JSONL with the category each one is filed
//! under, for debugging rule changes.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tally_core::{CalendarEvent, Category, RuleSet};

use super::util::TimeRange;

#[derive(Debug, Serialize)]
struct EventLine<'a> {
    #[serde(flatten)]
    event: &'a CalendarEvent,
    /// `None` for all-day events, which are never categorized.
    category: Option<Category>,
    /// Non-finite durations serialize as `null`.
    hours: f64,
}

/// Runs the events command, writing one JSON object per line.
pub fn run<W: Write>(
    writer: &mut W,
    rules: &RuleSet,
    events: Vec<CalendarEvent>,
    range: &TimeRange,
) -> Result<()> {
    for event in range.filter(events) {
        let line = EventLine {
            event: &event,
            category: (!event.all_day).then(|| rules.categorize(&event.title)),
            hours: event.hours(),
        };
        writeln!(writer, "{}", serde_json::to_string(&line)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tally_core::RuleVersion;

    fn lines(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn prints_category_and_hours() {
        let events = vec![
            CalendarEvent::new("Yoga", "2024-01-01T09:00:00Z", "2024-01-01T10:30:00Z"),
            CalendarEvent::new("Vacation", "2024-01-02", "2024-01-03").all_day(),
            CalendarEvent::new("Team sync", "bad", "2024-01-01T10:00:00Z"),
        ];
        let mut out = Vec::new();
        run(
            &mut out,
            RuleVersion::Final.rules(),
            events,
            &TimeRange::default(),
        )
        .unwrap();

        let lines = lines(out);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["title"], "Yoga");
        assert_eq!(lines[0]["startTime"], "2024-01-01T09:00:00Z");
        assert_eq!(lines[0]["category"], "exercise");
        assert_eq!(lines[0]["hours"], 1.5);
        assert!(lines[1]["category"].is_null());
        assert_eq!(lines[1]["allDay"], true);
        assert_eq!(lines[2]["category"], "work");
        assert!(lines[2]["hours"].is_null());
    }

    #[test]
    fn respects_range() {
        let events = vec![
            CalendarEvent::new("Yoga", "2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z"),
            CalendarEvent::new("Yoga", "2024-02-01T09:00:00Z", "2024-02-01T10:00:00Z"),
        ];
        let range = TimeRange {
            start: Some("2024-01-15T00:00:00Z".parse().unwrap()),
            end: None,
        };
        let mut out = Vec::new();
        run(&mut out, RuleVersion::V1.rules(), events, &range).unwrap();

        let lines = lines(out);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["startTime"], "2024-02-01T09:00:00Z");
    }
}
