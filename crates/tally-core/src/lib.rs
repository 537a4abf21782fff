//! Core domain logic for tally.
//!
//! This crate contains the fundamental types and logic for:
//! - Categorization: filing calendar event titles under life categories
//! - Aggregation: totalling event hours per category
//! - Summaries: percentages, grouped roll-ups and listings
//! - Auditing: finding rules that earlier rules shadow

pub mod aggregate;
pub mod audit;
pub mod category;
pub mod event;
pub mod rules;
pub mod summary;

pub use aggregate::{Aggregation, CategoryTally, TallyEntry, aggregate};
pub use audit::{RuleAudit, RuleStatus, audit};
pub use category::{Category, UnknownCategory};
pub use event::{CalendarEvent, parse_timestamp};
pub use rules::{Predicate, Rule, RuleSet, RuleVersion, UnknownRuleVersion, categorize};
pub use summary::{
    CategoryShare, Group, GroupShare, Summary, TitleBreakdown, breakdown, percent, samples,
};
