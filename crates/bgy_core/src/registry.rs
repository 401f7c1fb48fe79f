//! crates/bgy_core/src/registry.rs
//! Canonical barangay registry: the fixed, ordered reconciliation target.
//!
//! Invariants enforced at construction:
//! - non-empty (so per-row means never divide by zero)
//! - names non-empty and unique (exact string equality)
//! - coordinates finite and in range
//! - every alias targets a registered name

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::normalize::alias_key;

/// One canonical barangay. Wire names follow the map layer (`lat`, `lon`, `population`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarangayCanonical {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "lat"))]
    pub latitude: f64,
    #[cfg_attr(feature = "serde", serde(rename = "lon"))]
    pub longitude: f64,
    #[cfg_attr(feature = "serde", serde(rename = "population"))]
    pub reference_population: u64,
}

impl BarangayCanonical {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, reference_population: u64) -> Self {
        Self { name: name.into(), latitude, longitude, reference_population }
    }

    fn coordinates_ok(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Explicit alternate-spelling table: folded alias → canonical name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasTable {
    map: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` (any case/outer whitespace) for `canonical`. Later inserts win.
    pub fn insert(&mut self, alias: &str, canonical: impl Into<String>) {
        self.map.insert(alias_key(alias), canonical.into());
    }

    /// Canonical name an alias points to, if any.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.map.get(&alias_key(label)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// (folded alias, canonical name) pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}

impl<A: AsRef<str>, C: Into<String>> FromIterator<(A, C)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, C)>>(iter: I) -> Self {
        let mut t = AliasTable::new();
        for (a, c) in iter {
            t.insert(a.as_ref(), c);
        }
        t
    }
}

/// Ordered, validated registry. Order is the output row order of every report.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalRegistry {
    entries: Vec<BarangayCanonical>,
    aliases: AliasTable,
}

impl CanonicalRegistry {
    pub fn new(entries: Vec<BarangayCanonical>, aliases: AliasTable) -> Result<Self, CoreError> {
        if entries.is_empty() {
            return Err(CoreError::EmptyRegistry);
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for b in &entries {
            if b.name.is_empty() {
                return Err(CoreError::EmptyBarangayName);
            }
            if !seen.insert(b.name.as_str()) {
                return Err(CoreError::DuplicateBarangay(b.name.clone()));
            }
            if !b.coordinates_ok() {
                return Err(CoreError::InvalidCoordinate(b.name.clone()));
            }
        }
        for (alias, target) in aliases.iter() {
            if !seen.contains(target) {
                return Err(CoreError::UnknownAliasTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                });
            }
        }
        Ok(Self { entries, aliases })
    }

    pub fn entries(&self) -> &[BarangayCanonical] {
        &self.entries
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Number of canonical rows every reconciled report carries (never 0).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, name: &str) -> Option<&BarangayCanonical> {
        self.entries.iter().find(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two() -> Vec<BarangayCanonical> {
        vec![
            BarangayCanonical::new("Barangay 1", 10.80240, 122.97624, 4200),
            BarangayCanonical::new("Barangay Hawaiian", 10.82606, 123.00549, 3900),
        ]
    }

    #[test]
    fn keeps_declared_order() {
        let r = CanonicalRegistry::new(two(), AliasTable::new()).unwrap();
        let names: Vec<&str> = r.entries().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Barangay 1", "Barangay Hawaiian"]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(CanonicalRegistry::new(vec![], AliasTable::new()), Err(CoreError::EmptyRegistry));
        let mut dup = two();
        dup.push(BarangayCanonical::new("Barangay 1", 0.0, 0.0, 0));
        assert_eq!(
            CanonicalRegistry::new(dup, AliasTable::new()),
            Err(CoreError::DuplicateBarangay("Barangay 1".into()))
        );
    }

    #[test]
    fn case_variants_are_distinct_names() {
        let mut v = two();
        v.push(BarangayCanonical::new("barangay 1", 0.0, 0.0, 0));
        assert!(CanonicalRegistry::new(v, AliasTable::new()).is_ok());
    }

    #[test]
    fn rejects_bad_coordinates() {
        let v = vec![BarangayCanonical::new("X", 91.0, 0.0, 0)];
        assert!(matches!(CanonicalRegistry::new(v, AliasTable::new()), Err(CoreError::InvalidCoordinate(_))));
        let v = vec![BarangayCanonical::new("Y", f64::NAN, 0.0, 0)];
        assert!(CanonicalRegistry::new(v, AliasTable::new()).is_err());
    }

    #[test]
    fn alias_targets_must_exist() {
        let aliases: AliasTable = [("Hawaiian", "Barangay Hawaiian")].into_iter().collect();
        let r = CanonicalRegistry::new(two(), aliases).unwrap();
        assert_eq!(r.aliases().lookup("  HAWAIIAN "), Some("Barangay Hawaiian"));

        let bad: AliasTable = [("Pob.", "Poblacion")].into_iter().collect();
        assert!(matches!(
            CanonicalRegistry::new(two(), bad),
            Err(CoreError::UnknownAliasTarget { .. })
        ));
    }
}
