//! crates/bgy_io/src/residents.rs
//! Resident document shapes as stored upstream.
//!
//! Every field is optional and lenient: a missing key, `null`, or a value of the
//! wrong JSON type reads as absent instead of failing the document. Unknown keys
//! are ignored. A document that is not a JSON object becomes an empty record
//! (no label, so the aggregator excludes it).

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use bgy_core::{Category, EntityKind, Resident};

fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(serde_json::from_value(v).ok())
}

fn gender_is(gender: Option<&str>, cat: Category) -> bool {
    match cat {
        Category::Male => gender == Some("Male"),
        Category::Female => gender == Some("Female"),
        _ => false,
    }
}

fn is_yes(flag: Option<&str>) -> bool {
    flag == Some("Yes")
}

// ----- Senior (OSCA) ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeniorRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub identifying_information: Option<SeniorIdentity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeniorIdentity {
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<SeniorAddress>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_pension: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeniorAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub barangay: Option<String>,
}

impl SeniorRecord {
    fn identity(&self) -> Option<&SeniorIdentity> {
        self.identifying_information.as_ref()
    }

    /// A pension counts when the field holds something other than a "none" answer.
    pub fn has_pension(&self) -> bool {
        let Some(p) = self.identity().and_then(|i| i.current_pension.as_deref()) else {
            return false;
        };
        let p = p.trim();
        !p.is_empty() && !["none", "no", "n/a"].iter().any(|n| p.eq_ignore_ascii_case(n))
    }
}

impl Resident for SeniorRecord {
    fn barangay_label(&self) -> Option<&str> {
        self.identity()?.address.as_ref()?.barangay.as_deref()
    }

    fn has_category(&self, cat: Category) -> bool {
        match cat {
            Category::Male | Category::Female => {
                gender_is(self.identity().and_then(|i| i.gender.as_deref()), cat)
            }
            Category::WithPension => self.has_pension(),
            _ => false,
        }
    }
}

// ----- PWD (PDAO) -------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PwdRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub barangay: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<String>,
}

impl Resident for PwdRecord {
    fn barangay_label(&self) -> Option<&str> {
        self.barangay.as_deref()
    }

    fn has_category(&self, cat: Category) -> bool {
        gender_is(self.gender.as_deref(), cat)
    }
}

// ----- Youth (LYDO) -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YouthRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub barangay: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub registered_sk: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub voted_sk: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub registered_national: Option<String>,
}

impl Resident for YouthRecord {
    fn barangay_label(&self) -> Option<&str> {
        self.barangay.as_deref()
    }

    fn has_category(&self, cat: Category) -> bool {
        match cat {
            Category::Male | Category::Female => gender_is(self.gender.as_deref(), cat),
            Category::SkRegistered => is_yes(self.registered_sk.as_deref()),
            Category::SkVoted => is_yes(self.voted_sk.as_deref()),
            Category::NationalRegistered => is_yes(self.registered_national.as_deref()),
            Category::WithPension => false,
        }
    }
}

// ----- Tagged union -----------------------------------------------------------------------------

/// One parsed document of any entity kind.
#[derive(Debug, Clone)]
pub enum ResidentRecord {
    Senior(SeniorRecord),
    Pwd(PwdRecord),
    Youth(YouthRecord),
}

impl ResidentRecord {
    /// Parse one raw document as `kind`. Never fails.
    pub fn from_value(kind: EntityKind, v: Value) -> Self {
        match kind {
            EntityKind::Senior => ResidentRecord::Senior(serde_json::from_value(v).unwrap_or_default()),
            EntityKind::Pwd => ResidentRecord::Pwd(serde_json::from_value(v).unwrap_or_default()),
            EntityKind::Youth => ResidentRecord::Youth(serde_json::from_value(v).unwrap_or_default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            ResidentRecord::Senior(_) => EntityKind::Senior,
            ResidentRecord::Pwd(_) => EntityKind::Pwd,
            ResidentRecord::Youth(_) => EntityKind::Youth,
        }
    }
}

impl Resident for ResidentRecord {
    fn barangay_label(&self) -> Option<&str> {
        match self {
            ResidentRecord::Senior(r) => r.barangay_label(),
            ResidentRecord::Pwd(r) => r.barangay_label(),
            ResidentRecord::Youth(r) => r.barangay_label(),
        }
    }

    fn has_category(&self, cat: Category) -> bool {
        match self {
            ResidentRecord::Senior(r) => r.has_category(cat),
            ResidentRecord::Pwd(r) => r.has_category(cat),
            ResidentRecord::Youth(r) => r.has_category(cat),
        }
    }
}

/// Parse a bulk-read batch in input order.
pub fn parse_batch(kind: EntityKind, docs: Vec<Value>) -> Vec<ResidentRecord> {
    docs.into_iter().map(|d| ResidentRecord::from_value(kind, d)).collect()
}
