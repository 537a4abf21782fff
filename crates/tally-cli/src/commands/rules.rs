//! Rules command: print a rule chain in evaluation order.

use std::io::Write;

use anyhow::Result;
use tally_core::{Category, RuleSet};

/// Runs the rules command.
pub fn run<W: Write>(writer: &mut W, rules: &RuleSet) -> Result<()> {
    writeln!(writer, "RULES ({}), first match wins", rules.version())?;
    writeln!(writer)?;
    for (i, rule) in rules.rules().iter().enumerate() {
        writeln!(writer, "{:>2}. {:<20} {}", i + 1, rule.category, rule.predicate)?;
    }
    writeln!(writer, "    {:<20} (anything else)", Category::Miscellaneous)?;

    let groups = rules.groups();
    if !groups.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "GROUPS")?;
        writeln!(writer)?;
        for group in groups {
            let members: Vec<&str> = group.members.iter().map(Category::label).collect();
            writeln!(writer, "{:<20} {}", group.label, members.join(" + "))?;
        }
    }
    Ok(())
}
