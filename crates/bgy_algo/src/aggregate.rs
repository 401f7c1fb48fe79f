//! GROUP stage: bucket residents by their raw barangay label.
//!
//! Grouping is exact byte equality (no trimming, no case folding). Records whose
//! label is missing or exactly `""` are dropped before grouping.

use std::collections::BTreeMap;

use serde::Serialize;

use bgy_core::{Breakdown, Category, Resident};

/// One distinct raw label with its counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBucket {
    pub key: String,
    pub total_count: u64,
    pub sub_breakdowns: Breakdown,
}

/// Group `records` by label and count the `profile` categories.
///
/// Buckets come back in ascending label order.
pub fn aggregate<'a, R, I>(records: I, profile: &[Category]) -> Vec<AggregateBucket>
where
    R: Resident + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut by_label: BTreeMap<&'a str, AggregateBucket> = BTreeMap::new();

    for r in records {
        let label = match r.barangay_label() {
            Some(l) if !l.is_empty() => l,
            _ => continue,
        };
        let bucket = by_label.entry(label).or_insert_with(|| AggregateBucket {
            key: label.to_string(),
            total_count: 0,
            sub_breakdowns: Breakdown::zeroed(profile),
        });
        bucket.total_count = bucket.total_count.saturating_add(1);
        for &cat in profile {
            if r.has_category(cat) {
                bucket.sub_breakdowns.bump(cat);
            }
        }
    }

    by_label.into_values().collect()
}
