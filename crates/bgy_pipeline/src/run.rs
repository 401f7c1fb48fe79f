//! RUN stage: one bulk read per entity, then the pure stages in order.

use std::collections::BTreeMap;
use std::thread;

use bgy_algo::{aggregate, derive_analytics, reconcile, DerivedAnalytics, Reconciliation};
use bgy_core::{CanonicalRegistry, EntityKind};
use bgy_io::residents::parse_batch;
use bgy_io::source::ResidentSource;

use crate::PipelineError;

/// Everything one entity request produces. Request-scoped; nothing is persisted.
#[derive(Debug, Clone)]
pub struct EntityReport {
    pub kind: EntityKind,
    /// Documents returned by the bulk read (labelled or not).
    pub documents: usize,
    pub reconciliation: Reconciliation,
    pub analytics: DerivedAnalytics,
}

/// Read → parse leniently → aggregate → reconcile → derive.
pub fn run_entity<S>(source: &S, registry: &CanonicalRegistry, kind: EntityKind) -> Result<EntityReport, PipelineError>
where
    S: ResidentSource + ?Sized,
{
    let _span = tracing::info_span!("entity", kind = %kind).entered();

    let docs = source.bulk_read(kind)?;
    let documents = docs.len();
    let records = parse_batch(kind, docs);

    let profile = kind.profile();
    let buckets = aggregate(&records, profile);
    let reconciliation = reconcile(registry, &buckets, profile);
    let analytics = derive_analytics(&reconciliation.rows, profile)?;

    tracing::info!(
        documents,
        labels = buckets.len(),
        matched = reconciliation.matched_total(),
        unreconciled = reconciliation.unreconciled.total_count,
        "{} report built",
        kind.program()
    );

    Ok(EntityReport { kind, documents, reconciliation, analytics })
}

/// All three entity reports, each on its own scoped thread. Results are independent.
pub fn run_all<S>(
    source: &S,
    registry: &CanonicalRegistry,
) -> BTreeMap<EntityKind, Result<EntityReport, PipelineError>>
where
    S: ResidentSource + Sync + ?Sized,
{
    thread::scope(|scope| {
        let handles: Vec<_> = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, scope.spawn(move || run_entity(source, registry, kind))))
            .collect();
        handles
            .into_iter()
            .map(|(kind, h)| (kind, h.join().unwrap_or(Err(PipelineError::Worker(kind)))))
            .collect()
    })
}
