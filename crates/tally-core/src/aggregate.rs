//! Per-category hour accumulation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;
use crate::event::CalendarEvent;
use crate::rules::RuleSet;

/// One event as recorded in a tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    pub title: String,
    /// Start time as stored, not re-formatted.
    pub start: String,
    pub hours: f64,
}

/// Running total for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTally {
    pub total_hours: f64,
    /// Entries in input order.
    pub events: Vec<TallyEntry>,
}

impl CategoryTally {
    fn record(&mut self, event: &CalendarEvent, hours: f64) {
        self.total_hours += hours;
        self.events.push(TallyEntry {
            title: event.title.clone(),
            start: event.start_time.clone(),
            hours,
        });
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Result of aggregating a batch of events under one rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    /// One tally per reported category, zero tallies included.
    pub tallies: BTreeMap<Category, CategoryTally>,
    /// All-day events that were left out.
    pub skipped_all_day: usize,
}

impl Aggregation {
    /// Tally for a category; `None` if the rule set does not report it.
    pub fn tally(&self, category: Category) -> Option<&CategoryTally> {
        self.tallies.get(&category)
    }

    /// Hours for a category, zero when not reported.
    pub fn hours(&self, category: Category) -> f64 {
        self.tally(category).map_or(0.0, |t| t.total_hours)
    }

    /// Sum of every tally.
    pub fn total_hours(&self) -> f64 {
        self.tallies.values().map(|t| t.total_hours).sum()
    }

    /// Number of timed events that were categorized.
    pub fn event_count(&self) -> usize {
        self.tallies.values().map(CategoryTally::event_count).sum()
    }
}

/// Categorizes and totals `events`.
///
/// All-day events are skipped. Durations are not validated: a malformed
/// timestamp contributes `NaN` and a reversed range a negative value.
pub fn aggregate(rules: &RuleSet, events: &[CalendarEvent]) -> Aggregation {
    let mut tallies: BTreeMap<Category, CategoryTally> = rules
        .categories()
        .iter()
        .map(|&c| (c, CategoryTally::default()))
        .collect();
    let mut skipped_all_day = 0;

    for event in events {
        if event.all_day {
            skipped_all_day += 1;
            continue;
        }

        let category = rules.categorize(&event.title);
        let hours = event.hours();
        if !hours.is_finite() {
            tracing::debug!(title = %event.title, start = %event.start_time, "unreadable event duration");
        }

        tallies.entry(category).or_default().record(event, hours);
    }

    tracing::debug!(
        rules = %rules.version(),
        events = events.len(),
        skipped_all_day,
        "aggregated events"
    );

    Aggregation {
        tallies,
        skipped_all_day,
    }
}
