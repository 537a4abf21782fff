//! Report command for printing hours per category.
//!
//! This module implements `tally report` with rule set selection, a
//! start-time window and optional listings (title breakdown, samples), in
//! human-readable or JSON form.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tally_core::{
    Aggregation, CalendarEvent, Category, GroupShare, RuleVersion, Summary, TallyEntry,
    TitleBreakdown, aggregate, breakdown, samples,
};

use super::util::TimeRange;

/// What to include in a report.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub rules: RuleVersion,
    pub range: TimeRange,
    pub breakdown: Option<Category>,
    /// Entries listed per category; `None` leaves samples out.
    pub sample_limit: Option<usize>,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub summary: Summary,
    pub skipped_all_day: usize,
    pub breakdown: Option<(Category, Vec<TitleBreakdown>)>,
    pub samples: Vec<(Category, Vec<TallyEntry>)>,
}

// ========== Report Generation ==========

/// Aggregates `events` and derives everything the report shows.
pub fn generate_report_data(events: Vec<CalendarEvent>, options: &ReportOptions) -> ReportData {
    let events = options.range.filter(events);
    let agg: Aggregation = aggregate(options.rules.rules(), &events);

    let breakdown = options
        .breakdown
        .map(|category| (category, breakdown(&agg, category)));
    let samples = options
        .sample_limit
        .map(|limit| {
            samples(&agg, limit)
                .into_iter()
                .map(|(category, entries)| (category, entries.to_vec()))
                .collect()
        })
        .unwrap_or_default();

    ReportData {
        summary: Summary::new(options.rules, &agg),
        skipped_all_day: agg.skipped_all_day,
        breakdown,
        samples,
    }
}

// ========== Number Formatting ==========

/// Hours with two decimals. `NaN` stays visible as `NaN`.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// Percentage with one decimal, or `N/A` when total hours is zero.
pub fn format_percent(percent: Option<f64>) -> String {
    percent.map_or_else(|| "N/A".to_string(), |p| format!("{p:.1}%"))
}

fn section(output: &mut String, title: &str) {
    writeln!(output).unwrap();
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

// ========== Text Output ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    let summary = &data.summary;

    writeln!(output, "TIME BY CATEGORY ({} rules)", summary.rules).unwrap();

    if summary.event_count == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No timed events to report.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'tally import' to add synced events.").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    for share in summary.active_categories() {
        writeln!(
            output,
            "{}: {} hours ({} events) - {}",
            share.category.label().to_uppercase(),
            format_hours(share.hours),
            share.event_count,
            format_percent(share.percent)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "TOTAL: {} hours across {} events",
        format_hours(summary.total_hours),
        summary.event_count
    )
    .unwrap();
    if data.skipped_all_day > 0 {
        writeln!(output, "({} all-day events skipped)", data.skipped_all_day).unwrap();
    }

    section(&mut output, "UNCATEGORIZED");
    if summary.uncategorized.is_empty() {
        writeln!(output, "Everything is categorized.").unwrap();
    } else {
        for (i, entry) in summary.uncategorized.iter().enumerate() {
            writeln!(
                output,
                "{}. \"{}\" ({} hours)",
                i + 1,
                entry.title,
                format_hours(entry.hours)
            )
            .unwrap();
        }
    }

    if let Some((category, rows)) = &data.breakdown {
        section(
            &mut output,
            &format!("{} BREAKDOWN", category.label().to_uppercase()),
        );
        if rows.is_empty() {
            writeln!(output, "No events.").unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            writeln!(
                output,
                "{}. \"{}\" - {}h ({} events)",
                i + 1,
                row.title,
                format_hours(row.hours),
                row.count
            )
            .unwrap();
        }
    }

    if !data.samples.is_empty() {
        section(&mut output, "SAMPLES");
        for (category, entries) in &data.samples {
            writeln!(
                output,
                "{} (first {}):",
                category.label().to_uppercase(),
                entries.len()
            )
            .unwrap();
            for entry in entries {
                writeln!(output, "  - {} ({}h)", entry.title, format_hours(entry.hours)).unwrap();
            }
        }
    }

    if !summary.groups.is_empty() {
        section(&mut output, "GROUPS");
        for group in &summary.groups {
            writeln!(
                output,
                "{}: {} hours ({})",
                group.label,
                format_hours(group.hours),
                format_percent(group.percent)
            )
            .unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub rules: RuleVersion,
    pub total_hours: f64,
    pub event_count: usize,
    pub skipped_all_day: usize,
    /// Keyed by category label, in category order.
    pub categories: BTreeMap<Category, JsonCategory>,
    pub groups: &'a [GroupShare],
    pub uncategorized: &'a [TallyEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<JsonBreakdown<'a>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub samples: BTreeMap<Category, &'a [TallyEntry]>,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory {
    pub hours: f64,
    pub event_count: usize,
    pub percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JsonBreakdown<'a> {
    pub category: Category,
    pub titles: &'a [TitleBreakdown],
}

/// Formats report data as JSON.
///
/// Non-finite numbers (from unreadable timestamps) serialize as `null`.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let summary = &data.summary;
    let report = JsonReport {
        rules: summary.rules,
        total_hours: summary.total_hours,
        event_count: summary.event_count,
        skipped_all_day: data.skipped_all_day,
        categories: summary
            .categories
            .iter()
            .map(|share| {
                (
                    share.category,
                    JsonCategory {
                        hours: share.hours,
                        event_count: share.event_count,
                        percent: share.percent,
                    },
                )
            })
            .collect(),
        groups: &summary.groups,
        uncategorized: &summary.uncategorized,
        breakdown: data
            .breakdown
            .as_ref()
            .map(|(category, rows)| JsonBreakdown {
                category: *category,
                titles: rows,
            }),
        samples: data
            .samples
            .iter()
            .map(|(category, entries)| (*category, entries.as_slice()))
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    events: Vec<CalendarEvent>,
    options: &ReportOptions,
    json: bool,
) -> Result<()> {
    let data = generate_report_data(events, options);

    if json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }

    Ok(())
}
