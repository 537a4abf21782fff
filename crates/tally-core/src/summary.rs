//! Derived summaries over an [`Aggregation`]: shares, roll-ups and listings.
//!
//! Percentages are `None` when total hours is exactly zero. A `NaN` total
//! (from an unreadable timestamp) is not special-cased and propagates.

use serde::Serialize;

use crate::aggregate::{Aggregation, TallyEntry};
use crate::category::Category;
use crate::rules::RuleVersion;

/// A named roll-up over a fixed subset of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    /// Short key, e.g. `"self-care"`.
    pub name: &'static str,
    /// Display label, e.g. `"Self-care & wellness"`.
    pub label: &'static str,
    pub members: &'static [Category],
}

/// Roll-ups reported with the canonical rules.
pub const FINAL_GROUPS: &[Group] = &[
    Group {
        name: "creative",
        label: "Creative pursuits",
        members: &[
            Category::Ucla,
            Category::Play,
            Category::StandUpProduction,
            Category::PersonalWriting,
        ],
    },
    Group {
        name: "self-care",
        label: "Self-care & wellness",
        members: &[
            Category::Exercise,
            Category::Social,
            Category::PersonalDevelopment,
        ],
    },
    Group {
        name: "productive",
        label: "Productive work",
        members: &[Category::Work, Category::WisProduction, Category::JobSearch],
    },
    Group {
        name: "family",
        label: "Family time",
        members: &[Category::Family],
    },
    Group {
        name: "maintenance",
        label: "Life maintenance",
        members: &[Category::ErrandsChores, Category::DecisionStress],
    },
];

/// `part / total * 100`, or `None` when `total` is zero.
pub fn percent(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        None
    } else {
        Some(part / total * 100.0)
    }
}

/// One category line of a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub hours: f64,
    pub event_count: usize,
    pub percent: Option<f64>,
}

/// One roll-up line of a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShare {
    pub name: &'static str,
    pub label: &'static str,
    pub hours: f64,
    pub percent: Option<f64>,
}

/// Everything a report renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rules: RuleVersion,
    pub total_hours: f64,
    pub event_count: usize,
    /// Every reported category, most hours first.
    pub categories: Vec<CategoryShare>,
    pub groups: Vec<GroupShare>,
    /// Events that no rule claimed.
    pub uncategorized: Vec<TallyEntry>,
}

impl Summary {
    /// Builds the summary for an aggregation produced by `rules`.
    pub fn new(rules: RuleVersion, agg: &Aggregation) -> Self {
        let total_hours = agg.total_hours();

        let mut categories: Vec<CategoryShare> = agg
            .tallies
            .iter()
            .map(|(&category, tally)| CategoryShare {
                category,
                hours: tally.total_hours,
                event_count: tally.event_count(),
                percent: percent(tally.total_hours, total_hours),
            })
            .collect();
        // stable, so ties keep category order
        categories.sort_by(|a, b| b.hours.total_cmp(&a.hours));

        let groups = rules
            .rules()
            .groups()
            .iter()
            .map(|group| {
                let hours = group.members.iter().map(|&c| agg.hours(c)).sum();
                GroupShare {
                    name: group.name,
                    label: group.label,
                    hours,
                    percent: percent(hours, total_hours),
                }
            })
            .collect();

        let uncategorized = agg
            .tally(Category::Miscellaneous)
            .map(|t| t.events.clone())
            .unwrap_or_default();

        Self {
            rules,
            total_hours,
            event_count: agg.event_count(),
            categories,
            groups,
            uncategorized,
        }
    }

    /// Categories with positive hours, most hours first.
    pub fn active_categories(&self) -> impl Iterator<Item = &CategoryShare> {
        self.categories.iter().filter(|c| c.hours > 0.0)
    }
}

/// Hours and count for one distinct title within a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleBreakdown {
    pub title: String,
    pub count: usize,
    pub hours: f64,
}

/// Groups a category's entries by exact title, in first-seen order.
pub fn breakdown(agg: &Aggregation, category: Category) -> Vec<TitleBreakdown> {
    let mut rows: Vec<TitleBreakdown> = Vec::new();
    let Some(tally) = agg.tally(category) else {
        return rows;
    };
    for entry in &tally.events {
        if let Some(row) = rows.iter_mut().find(|r| r.title == entry.title) {
            row.count += 1;
            row.hours += entry.hours;
        } else {
            rows.push(TitleBreakdown {
                title: entry.title.clone(),
                count: 1,
                hours: entry.hours,
            });
        }
    }
    rows
}

/// First `limit` entries of every non-empty category except miscellaneous.
pub fn samples(agg: &Aggregation, limit: usize) -> Vec<(Category, &[TallyEntry])> {
    agg.tallies
        .iter()
        .filter(|(category, tally)| {
            **category != Category::Miscellaneous && !tally.events.is_empty()
        })
        .map(|(&category, tally)| (category, &tally.events[..limit.min(tally.events.len())]))
        .collect()
}
