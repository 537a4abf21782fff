//! Life categories as the single source of truth for category labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A life category an event can be filed under.
///
/// Declaration order is report order: tallies are keyed by this enum in a
/// `BTreeMap`, so every rule set lists its categories in this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Work,
    Play,
    Ucla,
    Exercise,
    Social,
    WisProduction,
    StandUpProduction,
    Family,
    JobSearch,
    PersonalWriting,
    PersonalDevelopment,
    ErrandsChores,
    DecisionStress,
    /// Only used by the `v1` rules; later split into WiS production.
    BusinessPlanning,
    /// Only used by the `v1` rules; later renamed stand-up production.
    Comedy,
    Miscellaneous,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Work,
        Self::Play,
        Self::Ucla,
        Self::Exercise,
        Self::Social,
        Self::WisProduction,
        Self::StandUpProduction,
        Self::Family,
        Self::JobSearch,
        Self::PersonalWriting,
        Self::PersonalDevelopment,
        Self::ErrandsChores,
        Self::DecisionStress,
        Self::BusinessPlanning,
        Self::Comedy,
        Self::Miscellaneous,
    ];

    /// The human label, e.g. `"WiS production"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Play => "play",
            Self::Ucla => "UCLA",
            Self::Exercise => "exercise",
            Self::Social => "social",
            Self::WisProduction => "WiS production",
            Self::StandUpProduction => "stand-up production",
            Self::Family => "family",
            Self::JobSearch => "job search",
            Self::PersonalWriting => "personal writing",
            Self::PersonalDevelopment => "personal development",
            Self::ErrandsChores => "errands/chores",
            Self::DecisionStress => "decision stress",
            Self::BusinessPlanning => "business planning",
            Self::Comedy => "comedy",
            Self::Miscellaneous => "miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(String);
