//! Classify command: show where titles would be filed.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tally_core::{Category, RuleSet};

/// Classification of one title.
#[derive(Debug, Serialize)]
struct Classification<'a> {
    title: &'a str,
    category: Category,
    /// 1-based position of the matching rule; `None` when nothing matched.
    rule: Option<usize>,
}

fn classify<'a>(rules: &RuleSet, title: &'a str) -> Classification<'a> {
    let matched = rules.first_match(title);
    Classification {
        title,
        category: matched.map_or(Category::Miscellaneous, |(_, rule)| rule.category),
        rule: matched.map(|(position, _)| position + 1),
    }
}

/// Runs the classify command.
pub fn run<W: Write>(writer: &mut W, rules: &RuleSet, titles: &[String], json: bool) -> Result<()> {
    for title in titles {
        let c = classify(rules, title);
        if json {
            writeln!(writer, "{}", serde_json::to_string(&c)?)?;
        } else {
            let rule = c
                .rule
                .map_or_else(|| "no rule".to_string(), |n| format!("rule {n}"));
            writeln!(writer, "{:<20} {:<8} {}", c.category, rule, c.title)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use tally_core::RuleVersion;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn text_output() {
        let mut out = Vec::new();
        run(
            &mut out,
            RuleVersion::Final.rules(),
            &titles(&["Dinner with Kendall", "Dinner at home", "Nap"]),
            false,
        )
        .unwrap();
        assert_snapshot!(String::from_utf8(out).unwrap(), @r"
social               rule 3   Dinner with Kendall
errands/chores       rule 11  Dinner at home
miscellaneous        no rule  Nap
");
    }

    #[test]
    fn json_output() {
        let mut out = Vec::new();
        run(
            &mut out,
            RuleVersion::V2.rules(),
            &titles(&["Morning Workout", ""]),
            true,
        )
        .unwrap();
        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["category"], "work");
        assert_eq!(lines[0]["rule"], 12);
        assert_eq!(lines[1]["category"], "miscellaneous");
        assert!(lines[1]["rule"].is_null());
    }
}
