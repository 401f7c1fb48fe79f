//! Derived figures over reconciled rows. Integer math only; shares are tenths of a percent.

use serde::Serialize;

use bgy_core::rounding::{div_round_half_up, format_tenths, percent_tenths};
use bgy_core::{Breakdown, Category, CoreError};

use crate::reconcile::ReconciledRow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowCount {
    pub name: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowShare {
    pub name: String,
    pub count: u64,
    /// Share of the municipal total, e.g. `"12.5"`.
    pub percent: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub pension: Option<RowPension>,
}

/// Pension coverage inside one barangay; the percentage is of that row's count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPension {
    pub without_pension: u64,
    pub pension_percentage: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionSplit {
    pub with_pension: u64,
    pub without_pension: u64,
    pub with_pension_percent: String,
    pub without_pension_percent: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAnalytics {
    pub total: u64,
    pub row_count: u64,
    /// `round_half_up(total / row_count)`.
    pub average: u64,
    pub category_totals: Breakdown,
    pub highest: Option<RowCount>,
    pub lowest: Option<RowCount>,
    pub shares: Vec<RowShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension: Option<PensionSplit>,
}

fn share(part: u64, whole: u64) -> Result<String, CoreError> {
    if whole == 0 {
        return Ok(format_tenths(0));
    }
    Ok(format_tenths(percent_tenths(part, whole)?))
}

/// First row holding the extreme non-zero count under `better`.
fn extreme(rows: &[ReconciledRow], better: impl Fn(u64, u64) -> bool) -> Option<RowCount> {
    let mut best: Option<&ReconciledRow> = None;
    for r in rows.iter().filter(|r| r.matched_count > 0) {
        match best {
            Some(b) if !better(r.matched_count, b.matched_count) => {}
            _ => best = Some(r),
        }
    }
    best.map(|r| RowCount { name: r.name().to_string(), count: r.matched_count })
}

/// Totals, mean, extremes, per-row shares and (when the profile has it) the pension split.
///
/// Errors only on an empty row set, which a validated registry never produces.
pub fn derive_analytics(rows: &[ReconciledRow], profile: &[Category]) -> Result<DerivedAnalytics, CoreError> {
    let total: u64 = rows.iter().map(|r| r.matched_count).sum();
    let row_count = rows.len() as u64;
    let average = div_round_half_up(total, row_count)?;

    let mut category_totals = Breakdown::zeroed(profile);
    for r in rows {
        category_totals.absorb(&r.breakdown);
    }

    let has_pension = profile.contains(&Category::WithPension);
    let shares = rows
        .iter()
        .map(|r| {
            let pension = if has_pension {
                let with = r.category(Category::WithPension);
                Some(RowPension {
                    without_pension: r.matched_count.saturating_sub(with),
                    pension_percentage: share(with, r.matched_count)?,
                })
            } else {
                None
            };
            Ok(RowShare {
                name: r.name().to_string(),
                count: r.matched_count,
                percent: share(r.matched_count, total)?,
                pension,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let pension = if has_pension {
        let with_pension = category_totals.get(Category::WithPension);
        let without_pension = total.saturating_sub(with_pension);
        Some(PensionSplit {
            with_pension,
            without_pension,
            with_pension_percent: share(with_pension, total)?,
            without_pension_percent: share(without_pension, total)?,
        })
    } else {
        None
    };

    Ok(DerivedAnalytics {
        total,
        row_count,
        average,
        category_totals,
        highest: extreme(rows, |a, b| a > b),
        lowest: extreme(rows, |a, b| a < b),
        shares,
        pension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgy_core::{BarangayCanonical, EntityKind};

    fn rows(counts: &[u64], profile: &[Category]) -> Vec<ReconciledRow> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let mut breakdown = Breakdown::zeroed(profile);
                for _ in 0..n {
                    breakdown.bump(Category::Female);
                }
                if n > 0 {
                    breakdown.bump(Category::WithPension);
                }
                ReconciledRow {
                    barangay: BarangayCanonical::new(format!("Barangay {}", i + 1), 10.8, 122.9, 1000),
                    matched_count: n,
                    breakdown,
                    matched_source_key: None,
                    match_tier: None,
                }
            })
            .collect()
    }

    fn sixteen_totalling(total: u64) -> Vec<u64> {
        let mut v = vec![0u64; 16];
        v[0] = total;
        v
    }

    #[test]
    fn mean_over_sixteen_rows() {
        let p = EntityKind::Pwd.profile();
        assert_eq!(derive_analytics(&rows(&sixteen_totalling(33), p), p).unwrap().average, 2);
        assert_eq!(derive_analytics(&rows(&sixteen_totalling(24), p), p).unwrap().average, 2);
        assert_eq!(derive_analytics(&rows(&sixteen_totalling(40), p), p).unwrap().average, 3);
    }

    #[test]
    fn totals_and_extremes() {
        let p = EntityKind::Pwd.profile();
        let a = derive_analytics(&rows(&[0, 3, 1, 3, 1], p), p).unwrap();
        assert_eq!(a.total, 8);
        assert_eq!(a.row_count, 5);
        assert_eq!(a.category_totals.get(Category::Female), 8);
        assert_eq!(a.highest, Some(RowCount { name: "Barangay 2".into(), count: 3 }));
        assert_eq!(a.lowest, Some(RowCount { name: "Barangay 3".into(), count: 1 }));
        assert_eq!(a.shares[1].percent, "37.5");
        assert_eq!(a.shares[0].percent, "0.0");
        assert!(a.pension.is_none());
        assert!(a.shares.iter().all(|s| s.pension.is_none()));
    }

    #[test]
    fn all_zero_has_no_extremes() {
        let p = EntityKind::Youth.profile();
        let a = derive_analytics(&rows(&[0, 0], p), p).unwrap();
        assert_eq!(a.total, 0);
        assert_eq!(a.average, 0);
        assert!(a.highest.is_none() && a.lowest.is_none());
        assert!(a.shares.iter().all(|s| s.percent == "0.0"));
    }

    #[test]
    fn senior_pension_split() {
        let p = EntityKind::Senior.profile();
        let a = derive_analytics(&rows(&[2, 0, 1, 5], p), p).unwrap();
        let split = a.pension.unwrap();
        assert_eq!(split.with_pension, 3);
        assert_eq!(split.without_pension, 5);
        assert_eq!(split.with_pension_percent, "37.5");
        assert_eq!(split.without_pension_percent, "62.5");
    }

    #[test]
    fn senior_rows_carry_their_own_pension_coverage() {
        let p = EntityKind::Senior.profile();
        let a = derive_analytics(&rows(&[4, 0, 1], p), p).unwrap();
        let first = a.shares[0].pension.as_ref().unwrap();
        assert_eq!(first.without_pension, 3);
        assert_eq!(first.pension_percentage, "25.0");
        let empty = a.shares[1].pension.as_ref().unwrap();
        assert_eq!(empty.without_pension, 0);
        assert_eq!(empty.pension_percentage, "0.0");
        assert_eq!(a.shares[2].pension.as_ref().unwrap().pension_percentage, "100.0");

        let v = serde_json::to_value(&a.shares[0]).unwrap();
        assert_eq!(v["withoutPension"], 3);
        assert_eq!(v["pensionPercentage"], "25.0");
    }

    #[test]
    fn empty_rows_are_rejected() {
        let p = EntityKind::Pwd.profile();
        assert_eq!(derive_analytics(&[], p), Err(CoreError::InvalidRatio));
    }
}
