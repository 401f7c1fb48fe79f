//! Label census: what raw labels a collection actually holds, before any matching.
//! Diagnostic only; feeds registry/alias maintenance.

use std::collections::BTreeMap;

use serde::Serialize;

use bgy_core::{EntityKind, Resident};
use bgy_io::residents::parse_batch;
use bgy_io::source::ResidentSource;

use crate::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Census {
    pub entity: EntityKind,
    pub total_documents: u64,
    /// Documents the aggregator would exclude (missing or `""` label).
    pub without_label: u64,
    /// Distinct raw labels, ascending.
    pub labels: Vec<LabelCount>,
}

pub fn census<S>(source: &S, kind: EntityKind) -> Result<Census, PipelineError>
where
    S: ResidentSource + ?Sized,
{
    let records = parse_batch(kind, source.bulk_read(kind)?);
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut without_label = 0u64;
    for r in &records {
        match r.barangay_label() {
            Some(l) if !l.is_empty() => *counts.entry(l).or_default() += 1,
            _ => without_label += 1,
        }
    }
    tracing::info!(%kind, documents = records.len(), distinct = counts.len(), without_label, "census");
    Ok(Census {
        entity: kind,
        total_documents: records.len() as u64,
        without_label,
        labels: counts.into_iter().map(|(l, count)| LabelCount { label: l.to_string(), count }).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgy_io::source::MemorySource;
    use serde_json::json;

    #[test]
    fn counts_raw_labels() {
        let src = MemorySource::new().with(
            EntityKind::Youth,
            vec![
                json!({"barangay": "Barangay 3"}),
                json!({"barangay": "barangay 3"}),
                json!({"barangay": "Barangay 3"}),
                json!({"barangay": ""}),
                json!({}),
                json!(42),
            ],
        );
        let c = census(&src, EntityKind::Youth).unwrap();
        assert_eq!(c.total_documents, 6);
        assert_eq!(c.without_label, 3);
        assert_eq!(
            c.labels,
            vec![
                LabelCount { label: "Barangay 3".into(), count: 2 },
                LabelCount { label: "barangay 3".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn census_propagates_upstream_failure() {
        let src = MemorySource::new();
        assert!(matches!(census(&src, EntityKind::Pwd), Err(PipelineError::Upstream(_))));
    }
}
