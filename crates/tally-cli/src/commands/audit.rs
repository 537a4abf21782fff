//! Audit command: replay stored titles to find shadowed rules.

use std::io::Write;

use anyhow::Result;
use tally_core::{CalendarEvent, RuleAudit, RuleSet, RuleStatus, audit};

/// Runs the audit command over the titles of timed events.
pub fn run<W: Write>(
    writer: &mut W,
    rules: &RuleSet,
    events: &[CalendarEvent],
    json: bool,
) -> Result<()> {
    let titles = events
        .iter()
        .filter(|e| !e.all_day)
        .map(|e| e.title.as_str());
    let audits = audit(rules, titles);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&audits)?)?;
        return Ok(());
    }

    writeln!(writer, "RULE AUDIT ({})", rules.version())?;
    writeln!(writer)?;
    for entry in &audits {
        writeln!(writer, "{}", format_line(entry))?;
    }

    let dead = audits
        .iter()
        .filter(|a| a.status() == RuleStatus::Shadowed)
        .count();
    writeln!(writer)?;
    if dead == 0 {
        writeln!(writer, "No shadowed rules.")?;
    } else {
        writeln!(writer, "{dead} shadowed rule(s): reorder or narrow the earlier rules.")?;
    }
    Ok(())
}

fn format_line(entry: &RuleAudit) -> String {
    let status = match entry.status() {
        RuleStatus::Live => "live",
        RuleStatus::Shadowed => "SHADOWED",
        RuleStatus::Unused => "unused",
    };
    let mut line = format!(
        "{:>2}. {:<20} matched {:>4}  claimed {:>4}  {status}",
        entry.position + 1,
        entry.category,
        entry.matched,
        entry.claimed,
    );
    if !entry.shadowed_by.is_empty() {
        let by: Vec<String> = entry
            .shadowed_by
            .iter()
            .map(|(category, n)| format!("{category} ({n})"))
            .collect();
        line.push_str(&format!("  lost to {}", by.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::RuleVersion;

    fn event(title: &str) -> CalendarEvent {
        CalendarEvent::new(title, "2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z")
    }

    #[test]
    fn text_output_marks_overlap() {
        let events = vec![
            event("Morning Workout"),
            event("Work Sync"),
            // claimed by exercise, but the work predicate (no "walk") also matches
            event("Run to work"),
            event("Work party").all_day(),
        ];
        let mut out = Vec::new();
        run(&mut out, RuleVersion::Final.rules(), &events, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("RULE AUDIT (final)\n"), "{text}");
        assert!(
            text.contains(" 1. exercise             matched    2  claimed    2  live"),
            "{text}"
        );
        assert!(
            text.contains("13. work                 matched    2  claimed    1  live  lost to exercise (1)"),
            "{text}"
        );
        assert!(text.contains("No shadowed rules."), "{text}");
    }

    #[test]
    fn json_output_lists_every_rule() {
        let mut out = Vec::new();
        run(&mut out, RuleVersion::V1.rules(), &[event("Open mic")], true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rules = value.as_array().unwrap();
        assert_eq!(rules.len(), 7);
        assert_eq!(rules[6]["category"], "comedy");
        assert_eq!(rules[6]["claimed"], 1);
        assert_eq!(rules[0]["matched"], 0);
    }
}
