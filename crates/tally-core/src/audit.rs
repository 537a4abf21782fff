//! Rule shadowing audit.
//!
//! Reordering or extending a rule chain can make a rule dead: every title it
//! would match is already claimed by an earlier rule. The audit replays a
//! corpus of titles and reports, per rule, how many titles its predicate
//! matches, how many it actually claims, and who took the rest.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;
use crate::rules::RuleSet;

/// How a rule fared on the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    /// Claims at least one title.
    Live,
    /// Matches titles, but earlier rules claim all of them.
    Shadowed,
    /// Matches nothing.
    Unused,
}

/// Audit result for one rule position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAudit {
    pub position: usize,
    pub category: Category,
    /// Titles the predicate matches on its own.
    pub matched: usize,
    /// Titles this rule was first to match.
    pub claimed: usize,
    /// Categories of earlier rules that claimed the remaining matches.
    pub shadowed_by: BTreeMap<Category, usize>,
}

impl RuleAudit {
    pub const fn status(&self) -> RuleStatus {
        if self.claimed > 0 {
            RuleStatus::Live
        } else if self.matched > 0 {
            RuleStatus::Shadowed
        } else {
            RuleStatus::Unused
        }
    }
}

/// Replays `titles` through `rules`.
pub fn audit<'a>(rules: &RuleSet, titles: impl IntoIterator<Item = &'a str>) -> Vec<RuleAudit> {
    let mut audits: Vec<RuleAudit> = rules
        .rules()
        .iter()
        .enumerate()
        .map(|(position, rule)| RuleAudit {
            position,
            category: rule.category,
            matched: 0,
            claimed: 0,
            shadowed_by: BTreeMap::new(),
        })
        .collect();

    for title in titles {
        if title.is_empty() {
            continue;
        }
        let lower = title.to_lowercase();
        let mut winner: Option<Category> = None;
        for (rule, entry) in rules.rules().iter().zip(audits.iter_mut()) {
            if !rule.predicate.matches(&lower) {
                continue;
            }
            entry.matched += 1;
            match winner {
                None => {
                    entry.claimed += 1;
                    winner = Some(rule.category);
                }
                Some(first) => *entry.shadowed_by.entry(first).or_default() += 1,
            }
        }
    }

    audits
}
