//! crates/bgy_core/src/entities.rs
//! Entity kinds, breakdown categories and the `Resident` view used by aggregation.
//! No I/O; document shapes live in `bgy_io::residents`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ----- Entity kinds -----------------------------------------------------------------------------

/// The three independently maintained resident collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityKind {
    Senior,
    Pwd,
    Youth,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Senior, EntityKind::Pwd, EntityKind::Youth];

    /// Wire token (`senior` | `pwd` | `youth`).
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Senior => "senior",
            EntityKind::Pwd => "pwd",
            EntityKind::Youth => "youth",
        }
    }

    /// Office running the program the registrants belong to.
    pub fn program(self) -> &'static str {
        match self {
            EntityKind::Senior => "OSCA",
            EntityKind::Pwd => "PDAO",
            EntityKind::Youth => "LYDO",
        }
    }

    /// Plural noun used in log lines and insight sentences.
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Senior => "seniors",
            EntityKind::Pwd => "PWDs",
            EntityKind::Youth => "youths",
        }
    }

    /// Fixed breakdown profile: which categories are counted for this entity, in order.
    pub fn profile(self) -> &'static [Category] {
        match self {
            EntityKind::Senior => &[Category::Male, Category::Female, Category::WithPension],
            EntityKind::Pwd => &[Category::Male, Category::Female],
            EntityKind::Youth => &[
                Category::Male,
                Category::Female,
                Category::SkRegistered,
                Category::SkVoted,
                Category::NationalRegistered,
            ],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "senior" | "seniors" | "osca" => Ok(EntityKind::Senior),
            "pwd" | "pwds" | "pdao" => Ok(EntityKind::Pwd),
            "youth" | "youths" | "lydo" => Ok(EntityKind::Youth),
            _ => Err(CoreError::InvalidToken(s.to_string())),
        }
    }
}

// ----- Categories -------------------------------------------------------------------------------

/// Named sub-breakdown bucket. Declaration order is the canonical output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    #[cfg_attr(feature = "serde", serde(rename = "maleCount"))]
    Male,
    #[cfg_attr(feature = "serde", serde(rename = "femaleCount"))]
    Female,
    #[cfg_attr(feature = "serde", serde(rename = "withPension"))]
    WithPension,
    #[cfg_attr(feature = "serde", serde(rename = "skRegistered"))]
    SkRegistered,
    #[cfg_attr(feature = "serde", serde(rename = "skVoted"))]
    SkVoted,
    #[cfg_attr(feature = "serde", serde(rename = "nationalRegistered"))]
    NationalRegistered,
}

impl Category {
    /// Wire key, identical to the serde name.
    pub fn key(self) -> &'static str {
        match self {
            Category::Male => "maleCount",
            Category::Female => "femaleCount",
            Category::WithPension => "withPension",
            Category::SkRegistered => "skRegistered",
            Category::SkVoted => "skVoted",
            Category::NationalRegistered => "nationalRegistered",
        }
    }

    /// Column heading for tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Male => "Male",
            Category::Female => "Female",
            Category::WithPension => "With pension",
            Category::SkRegistered => "SK registered",
            Category::SkVoted => "SK voted",
            Category::NationalRegistered => "National registered",
        }
    }
}

// ----- Breakdown --------------------------------------------------------------------------------

/// Per-category counters. Always holds every category of its profile, zero-filled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Breakdown(BTreeMap<Category, u64>);

impl Breakdown {
    /// All categories of `profile` at zero.
    pub fn zeroed(profile: &[Category]) -> Self {
        Breakdown(profile.iter().map(|&c| (c, 0)).collect())
    }

    /// Count for `cat`; categories outside the profile read as 0.
    pub fn get(&self, cat: Category) -> u64 {
        self.0.get(&cat).copied().unwrap_or(0)
    }

    /// Increment `cat` if it belongs to this breakdown's profile. Returns whether it did.
    pub fn bump(&mut self, cat: Category) -> bool {
        match self.0.get_mut(&cat) {
            Some(n) => {
                *n = n.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Add another breakdown's counts into this one (only shared categories).
    pub fn absorb(&mut self, other: &Breakdown) {
        for (cat, n) in self.0.iter_mut() {
            *n = n.saturating_add(other.get(*cat));
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.0.iter().map(|(c, n)| (*c, *n))
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(|&n| n == 0)
    }
}

// ----- Resident view ----------------------------------------------------------------------------

/// What the aggregator needs from a resident record, regardless of document shape.
pub trait Resident {
    /// Raw free-text barangay label as entered by staff (`None` when missing or not a string).
    fn barangay_label(&self) -> Option<&str>;

    /// Whether this record falls into `cat`. Unrecognised values answer `false`.
    fn has_category(&self, cat: Category) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_fixed_and_ordered() {
        assert_eq!(EntityKind::Pwd.profile(), &[Category::Male, Category::Female]);
        assert_eq!(EntityKind::Youth.profile().len(), 5);
        assert!(EntityKind::Senior.profile().contains(&Category::WithPension));
    }

    #[test]
    fn entity_tokens_parse() {
        assert_eq!("PWD".parse::<EntityKind>().unwrap(), EntityKind::Pwd);
        assert_eq!("osca".parse::<EntityKind>().unwrap(), EntityKind::Senior);
        assert_eq!(" youth ".parse::<EntityKind>().unwrap(), EntityKind::Youth);
        assert!("farmer".parse::<EntityKind>().is_err());
    }

    #[test]
    fn breakdown_only_counts_profile_categories() {
        let mut b = Breakdown::zeroed(EntityKind::Pwd.profile());
        assert!(b.bump(Category::Male));
        assert!(!b.bump(Category::SkVoted));
        assert_eq!(b.get(Category::Male), 1);
        assert_eq!(b.get(Category::SkVoted), 0);
        assert_eq!(b.categories().count(), 2);
    }

    #[test]
    fn absorb_adds_shared_categories() {
        let mut a = Breakdown::zeroed(EntityKind::Youth.profile());
        let mut b = Breakdown::zeroed(EntityKind::Youth.profile());
        b.bump(Category::SkVoted);
        b.bump(Category::SkVoted);
        a.absorb(&b);
        assert_eq!(a.get(Category::SkVoted), 2);
        assert!(!a.is_all_zero());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn breakdown_serializes_with_wire_keys() {
        let mut b = Breakdown::zeroed(EntityKind::Pwd.profile());
        b.bump(Category::Female);
        let s = serde_json::to_string(&b).unwrap();
        assert_eq!(s, r#"{"maleCount":0,"femaleCount":1}"#);
    }
}
