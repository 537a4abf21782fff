//! Ordered keyword rules that file an event title under a category.
//!
//! A [`RuleSet`] is an ordered list of `(category, predicate)` pairs. The
//! title is lower-cased once and the first rule whose predicate matches
//! wins. Order is load-bearing: several predicates overlap (a title with
//! "workout" also contains "work"), and later rules are intentionally
//! broad.
//!
//! Matching is plain substring containment, not whole words, so "Brunch"
//! contains "run" and is filed as exercise.
//!
//! Three versions exist. [`RuleVersion::Final`] is canonical; `v1` and `v2`
//! are kept so older reports can be reproduced.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::summary::{FINAL_GROUPS, Group};

/// A boolean expression over substring tests on a lower-cased title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// The title contains this (lower-case) needle.
    Contains(&'static str),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

/// Substring test.
pub const fn has(needle: &'static str) -> Predicate {
    Predicate::Contains(needle)
}

/// Negation.
pub fn not(predicate: Predicate) -> Predicate {
    Predicate::Not(Box::new(predicate))
}

/// True when any operand is true.
pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Any(predicates.into_iter().collect())
}

/// True when every operand is true.
pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::All(predicates.into_iter().collect())
}

/// True when the title contains any of the needles.
pub fn any_of(needles: &[&'static str]) -> Predicate {
    any(needles.iter().copied().map(has))
}

impl Predicate {
    /// Evaluates against an already lower-cased title.
    pub fn matches(&self, lower: &str) -> bool {
        match self {
            Self::Contains(needle) => lower.contains(needle),
            Self::Not(inner) => !inner.matches(lower),
            Self::All(items) => items.iter().all(|p| p.matches(lower)),
            Self::Any(items) => items.iter().any(|p| p.matches(lower)),
        }
    }

    /// Conjunction, flattening into an existing `All`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::All(mut items) => {
                items.push(other);
                Self::All(items)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// `self` and the title does not contain `needle`.
    #[must_use]
    pub fn and_not(self, needle: &'static str) -> Self {
        self.and(not(has(needle)))
    }

    /// Disjunction, flattening into an existing `Any`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Any(mut items) => {
                items.push(other);
                Self::Any(items)
            }
            first => Self::Any(vec![first, other]),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(items) | Self::Any(items) if items.len() > 1 => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (items, sep) = match self {
            Self::Contains(needle) => return write!(f, "{needle:?}"),
            Self::Not(inner) => {
                f.write_str("!")?;
                return inner.fmt_operand(f);
            }
            Self::All(items) => (items, " & "),
            Self::Any(items) => (items, " | "),
        };
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            item.fmt_operand(f)?;
        }
        Ok(())
    }
}

/// One entry of a rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub category: Category,
    pub predicate: Predicate,
}

impl Rule {
    pub const fn new(category: Category, predicate: Predicate) -> Self {
        Self {
            category,
            predicate,
        }
    }
}

/// Which generation of the keyword rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleVersion {
    /// Eight categories; work is tried first.
    V1,
    /// Split categories, no decision stress, workouts still count as work.
    V2,
    /// Canonical rules.
    #[default]
    Final,
}

impl RuleVersion {
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::Final];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::Final => "final",
        }
    }

    /// The rule set for this version.
    pub fn rules(self) -> &'static RuleSet {
        match self {
            Self::V1 => &V1_RULES,
            Self::V2 => &V2_RULES,
            Self::Final => &FINAL_RULES,
        }
    }
}

impl fmt::Display for RuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RuleVersion {
    type Err = UnknownRuleVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            "final" => Ok(Self::Final),
            _ => Err(UnknownRuleVersion(s.to_string())),
        }
    }
}

impl Serialize for RuleVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown rule version strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule version: {0} (expected v1, v2 or final)")]
pub struct UnknownRuleVersion(String);

/// An ordered rule chain plus the categories it reports.
#[derive(Debug)]
pub struct RuleSet {
    version: RuleVersion,
    rules: Vec<Rule>,
    categories: Vec<Category>,
    groups: &'static [Group],
}

impl RuleSet {
    /// Builds a rule set. Reported categories are every rule's category plus
    /// `miscellaneous`, in [`Category`] order.
    pub fn new(version: RuleVersion, rules: Vec<Rule>, groups: &'static [Group]) -> Self {
        let mut categories: Vec<Category> = rules.iter().map(|r| r.category).collect();
        categories.push(Category::Miscellaneous);
        categories.sort_unstable();
        categories.dedup();
        Self {
            version,
            rules,
            categories,
            groups,
        }
    }

    pub const fn version(&self) -> RuleVersion {
        self.version
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub const fn groups(&self) -> &'static [Group] {
        self.groups
    }

    /// Position and rule of the first match, if any.
    pub fn first_match(&self, title: &str) -> Option<(usize, &Rule)> {
        if title.is_empty() {
            return None;
        }
        let lower = title.to_lowercase();
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.predicate.matches(&lower))
    }

    /// Category of the first matching rule, or `None` when nothing matches.
    pub fn classify(&self, title: &str) -> Option<Category> {
        self.first_match(title).map(|(_, rule)| rule.category)
    }

    /// Like [`classify`](Self::classify) but falls through to
    /// [`Category::Miscellaneous`].
    pub fn categorize(&self, title: &str) -> Category {
        self.classify(title).unwrap_or(Category::Miscellaneous)
    }
}

/// Files a title using the canonical rules.
pub fn categorize(title: &str) -> Category {
    FINAL_RULES.categorize(title)
}

static FINAL_RULES: LazyLock<RuleSet> = LazyLock::new(final_rules);
static V2_RULES: LazyLock<RuleSet> = LazyLock::new(v2_rules);
static V1_RULES: LazyLock<RuleSet> = LazyLock::new(v1_rules);

// ========== Rule Tables ==========

fn final_rules() -> RuleSet {
    use Category as C;

    let rules = vec![
        Rule::new(
            C::Exercise,
            any_of(&[
                "workout",
                "saturday stairs",
                "november project",
                "hike",
                "yoga",
                "sculpt",
                "vinyasa",
                "run",
                "walk to",
                "walk from",
                "weflowhard",
                "fitness:",
            ]),
        ),
        Rule::new(C::StandUpProduction, stand_up_keywords()),
        Rule::new(C::Social, social_keywords()),
        Rule::new(C::WisProduction, wis_keywords()),
        Rule::new(
            C::Ucla,
            any_of(&[
                "ucla",
                "watch tms",
                "watch veep",
                "abbott elementary",
                "tv",
            ]),
        ),
        Rule::new(C::Family, family_keywords()),
        Rule::new(C::JobSearch, job_search_keywords()),
        Rule::new(C::PersonalWriting, writing_keywords()),
        Rule::new(C::PersonalDevelopment, has("journal")),
        Rule::new(
            C::DecisionStress,
            any_of(&["gift shopping", "plane ticket", "buy plane", "re-think"]),
        ),
        Rule::new(
            C::ErrandsChores,
            errand_keywords()
                .or(has("lunch"))
                .or(has("breakfast"))
                .or(has("dinner").and_not("kendall"))
                .or(has("cook"))
                .or(has("meal"))
                .or(has("doctor"))
                .or(has("tia appointment"))
                .or(has("appt")),
        ),
        Rule::new(C::Play, play_keywords()),
        Rule::new(
            C::Work,
            work_keywords(has("work").and_not("walk").and_not("workout").and_not("network"))
                .or(has("prep for 1:1")),
        ),
    ];

    RuleSet::new(RuleVersion::Final, rules, FINAL_GROUPS)
}

fn v2_rules() -> RuleSet {
    use Category as C;

    let rules = vec![
        Rule::new(
            C::Exercise,
            any_of(&[
                "saturday stairs",
                "november project",
                "hike",
                "yoga",
                "sculpt",
                "vinyasa",
                "run",
                "walk to",
                "walk from",
                "weflowhard",
                "fitness:",
            ]),
        ),
        Rule::new(C::StandUpProduction, stand_up_keywords()),
        Rule::new(C::Social, social_keywords()),
        Rule::new(C::WisProduction, wis_keywords()),
        Rule::new(
            C::Ucla,
            any_of(&[
                "ucla",
                "watch tms",
                "watch veep",
                "abbott elementary",
                "tv",
            ]),
        ),
        Rule::new(C::Family, family_keywords()),
        Rule::new(C::JobSearch, job_search_keywords()),
        Rule::new(C::PersonalWriting, writing_keywords()),
        Rule::new(C::PersonalDevelopment, has("journal")),
        Rule::new(C::ErrandsChores, errand_keywords()),
        Rule::new(C::Play, play_keywords()),
        Rule::new(C::Work, work_keywords(has("work").and_not("walk"))),
    ];

    RuleSet::new(RuleVersion::V2, rules, &[])
}

fn v1_rules() -> RuleSet {
    use Category as C;

    let rules = vec![
        Rule::new(
            C::Work,
            // predates the "workshop" keyword
            any([
                has("work").and_not("walk"),
                has("meeting").and_not("play"),
                has("touchpoint"),
                has("sync"),
                has("job app"),
                has("resume"),
                has("kustomer"),
            ]),
        ),
        Rule::new(C::Play, any_of(&["play:", "marten", "susan"])),
        Rule::new(C::Ucla, has("ucla")),
        Rule::new(
            C::Exercise,
            any_of(&[
                "yoga",
                "sculpt",
                "vinyasa",
                "run",
                "walk to",
                "walk from",
                "weflowhard",
            ]),
        ),
        Rule::new(
            C::Social,
            any_of(&[
                "hang with",
                "coffee with",
                "church",
                "hannah",
                "alison",
                "david lee",
            ]),
        ),
        Rule::new(C::BusinessPlanning, any_of(&["business plan", "wis"])),
        Rule::new(
            C::Comedy,
            any_of(&["stand up", "hoopla", "open mic", "comedy"]),
        ),
    ];

    RuleSet::new(RuleVersion::V1, rules, &[])
}

// Keyword groups shared by `v2` and `final`.

fn stand_up_keywords() -> Predicate {
    any_of(&[
        "coffee with david lee",
        "stand up",
        "hoopla",
        "open mic",
        "hype mic",
        "comedy",
    ])
}

fn social_keywords() -> Predicate {
    any_of(&[
        "joel",
        "date",
        "dinner with kendall",
        "hang with",
        "church",
        "hannah",
        "alison",
        "philharmonic",
        "wicked",
        "harry potter",
        "funny games",
    ])
}

fn wis_keywords() -> Predicate {
    any_of(&[
        "meet simone",
        "business plan",
        "wis",
        "post on linkedin",
        "women in stem",
    ])
}

fn family_keywords() -> Predicate {
    any_of(&[
        "travel",
        "flight",
        "thanksgiving",
        "family time",
        "get nails done",
        "mm weekly",
        "fort lauderdale",
        "fll",
        "pool/sauna",
        "black friday",
        "drive rachel",
        "drive allie",
        "talk to mom",
    ])
}

fn job_search_keywords() -> Predicate {
    any_of(&[
        "update linkedin",
        "job app",
        "resume",
        "job search",
        "kustomer",
    ])
    .or(has("pro dev").and(has("tyler")))
}

fn writing_keywords() -> Predicate {
    any_of(&["blog writing", "write: blog"]).or(has("write").and_not("ucla"))
}

fn errand_keywords() -> Predicate {
    any_of(&["grocery", "trader joe", "food pantry"])
        .or(has("shopping").and_not("gift"))
        .or(has("laundry"))
        .or(has("clean room"))
        .or(has("bargain basket"))
}

fn play_keywords() -> Predicate {
    any_of(&["play:", "marten", "susan", "coaching session"])
}

/// Work keywords built around the version-specific "work" test.
fn work_keywords(work: Predicate) -> Predicate {
    any([
        work,
        has("meeting").and_not("play"),
        has("touchpoint"),
        has("sync"),
        has("workshop"),
    ])
}
