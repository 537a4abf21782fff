//! Import command for appending synced calendar events to the store.

use std::io::Read;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use tally_core::CalendarEvent;
use tally_store::Store;

/// Reads events from `reader`, appends them and saves the store.
///
/// Returns the number of events actually appended; events whose `id` is
/// already stored are skipped.
pub fn run<R: Read>(store: &mut Store, reader: R) -> Result<usize> {
    let events = parse_events(reader)?;
    let received = events.len();
    let added = store.append_events(events)?;
    store
        .save()
        .with_context(|| format!("failed to save {}", store.path().display()))?;
    tracing::info!(received, added, "imported events");
    Ok(added)
}

/// Accepts either one JSON array or one event object per line.
fn parse_events<R: Read>(mut reader: R) -> Result<Vec<Value>> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let trimmed = input.trim_start();

    if trimmed.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(trimmed).context("invalid JSON array")?;
        for (idx, value) in values.iter().enumerate() {
            check_event(value).with_context(|| format!("invalid event at index {idx}"))?;
        }
        return Ok(values);
    }

    let mut values = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        check_event(&value).with_context(|| format!("invalid event on line {}", idx + 1))?;
        values.push(value);
    }
    Ok(values)
}

fn check_event(value: &Value) -> Result<()> {
    if !value.is_object() {
        bail!("expected an object");
    }
    // blank titles and timestamps are valid; they read as miscellaneous and NaN hours
    serde_json::from_value::<CalendarEvent>(value.clone())?;
    Ok(())
}
