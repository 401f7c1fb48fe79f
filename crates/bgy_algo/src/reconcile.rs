//! RECONCILE stage: fold label buckets into the canonical barangay rows.
//!
//! Tiers, strict priority, resolved tier-major:
//!   1. exact           `label == name`
//!   2. case-insensitive `lower(label) == lower(name)`
//!   3. heuristic       either folded string contains the other, or the alias
//!                      table maps the label to `name`
//!
//! Every canonical entry first tries tier 1 over all buckets; entries still
//! unmatched then try tier 2 over the buckets nobody has claimed; then tier 3.
//! Within a tier the first bucket in ascending label order wins. A bucket is
//! claimed by at most one row, so Σ rows + unreconciled total = Σ buckets.
//! Per-entry matching would credit a loose label such as "Barangay" to every
//! remaining row; claiming counts it once.

use serde::Serialize;

use bgy_core::normalize::{contains_either, fold};
use bgy_core::{BarangayCanonical, Breakdown, Category, CanonicalRegistry};

use crate::aggregate::AggregateBucket;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Heuristic,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 3] = [MatchTier::Exact, MatchTier::CaseInsensitive, MatchTier::Heuristic];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::CaseInsensitive => "case_insensitive",
            MatchTier::Heuristic => "heuristic",
        }
    }
}

/// One canonical barangay with whatever bucket it absorbed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledRow {
    #[serde(flatten)]
    pub barangay: BarangayCanonical,
    pub matched_count: u64,
    pub breakdown: Breakdown,
    pub matched_source_key: Option<String>,
    pub match_tier: Option<MatchTier>,
}

impl ReconciledRow {
    pub fn name(&self) -> &str {
        &self.barangay.name
    }

    pub fn category(&self, cat: Category) -> u64 {
        self.breakdown.get(cat)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnreconciledLabel {
    pub label: String,
    pub count: u64,
}

/// Buckets no canonical row claimed, ascending by label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreconciledReport {
    pub total_count: u64,
    pub labels: Vec<UnreconciledLabel>,
}

impl UnreconciledReport {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    /// Exactly one per registry entry, registry order.
    pub rows: Vec<ReconciledRow>,
    pub unreconciled: UnreconciledReport,
}

impl Reconciliation {
    pub fn matched_total(&self) -> u64 {
        self.rows.iter().map(|r| r.matched_count).sum()
    }
}

struct Candidate<'a> {
    bucket: &'a AggregateBucket,
    folded: String,
    claimed: bool,
}

fn tier_matches(
    tier: MatchTier,
    registry: &CanonicalRegistry,
    name: &str,
    folded_name: &str,
    c: &Candidate<'_>,
) -> bool {
    match tier {
        MatchTier::Exact => c.bucket.key == name,
        MatchTier::CaseInsensitive => c.folded == folded_name,
        MatchTier::Heuristic => {
            contains_either(&c.folded, folded_name) || registry.aliases().lookup(&c.bucket.key) == Some(name)
        }
    }
}

/// Merge `buckets` into one row per canonical barangay.
pub fn reconcile(
    registry: &CanonicalRegistry,
    buckets: &[AggregateBucket],
    profile: &[Category],
) -> Reconciliation {
    let mut candidates: Vec<Candidate<'_>> = buckets
        .iter()
        .map(|b| Candidate { bucket: b, folded: fold(&b.key), claimed: false })
        .collect();
    candidates.sort_by(|a, b| a.bucket.key.cmp(&b.bucket.key));

    let entries = registry.entries();
    let folded_names: Vec<String> = entries.iter().map(|b| fold(&b.name)).collect();
    let mut assigned: Vec<Option<(usize, MatchTier)>> = vec![None; entries.len()];

    for tier in MatchTier::ORDER {
        for (ci, canon) in entries.iter().enumerate() {
            if assigned[ci].is_some() {
                continue;
            }
            let hit = candidates.iter().position(|c| {
                !c.claimed && tier_matches(tier, registry, &canon.name, &folded_names[ci], c)
            });
            if let Some(bi) = hit {
                candidates[bi].claimed = true;
                assigned[ci] = Some((bi, tier));
            }
        }
    }

    let rows: Vec<ReconciledRow> = entries
        .iter()
        .zip(&assigned)
        .map(|(canon, slot)| {
            let mut breakdown = Breakdown::zeroed(profile);
            let (matched_count, matched_source_key, match_tier) = match slot {
                Some((bi, tier)) => {
                    let b = candidates[*bi].bucket;
                    breakdown.absorb(&b.sub_breakdowns);
                    tracing::debug!(
                        barangay = %canon.name,
                        source = %b.key,
                        tier = tier.as_str(),
                        count = b.total_count,
                        "reconciled"
                    );
                    (b.total_count, Some(b.key.clone()), Some(*tier))
                }
                None => {
                    tracing::debug!(barangay = %canon.name, "no matching label; zero-filled");
                    (0, None, None)
                }
            };
            ReconciledRow {
                barangay: canon.clone(),
                matched_count,
                breakdown,
                matched_source_key,
                match_tier,
            }
        })
        .collect();

    let mut unreconciled = UnreconciledReport::default();
    for c in candidates.iter().filter(|c| !c.claimed) {
        tracing::warn!(label = %c.bucket.key, count = c.bucket.total_count, "label matched no canonical barangay");
        unreconciled.total_count = unreconciled.total_count.saturating_add(c.bucket.total_count);
        unreconciled.labels.push(UnreconciledLabel { label: c.bucket.key.clone(), count: c.bucket.total_count });
    }

    Reconciliation { rows, unreconciled }
}
