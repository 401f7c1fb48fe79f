//! Request-scoped analytics view: search, pagination and per-row insight over one entity report.
//!
//! Built fresh for every request from an `EntityReport` + `ViewOptions`; holds no state
//! between requests.

use serde::Serialize;

use bgy_algo::{PensionSplit, RowCount, RowPension};
use bgy_core::rounding::{format_tenths, percent_tenths};
use bgy_core::{Breakdown, EntityKind};
use bgy_pipeline::EntityReport;

use crate::ReportError;

pub const DEFAULT_PER_PAGE: usize = 5;
/// Page numbers shown around the current page.
pub const PAGE_WINDOW: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    /// Case-insensitive substring over barangay names; blank means no filter.
    pub search: Option<String>,
    /// 1-based; clamped into range.
    pub page: usize,
    pub per_page: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { search: None, page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow {
    pub name: String,
    pub count: u64,
    pub population: u64,
    /// Share of the municipal total, e.g. `"12.5"`.
    pub percent: String,
    pub breakdown: Breakdown,
    /// Seniors only.
    pub pension: Option<RowPension>,
    pub insight: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsView {
    pub entity: EntityKind,
    pub program: &'static str,
    pub total: u64,
    pub average: u64,
    pub highest: Option<RowCount>,
    pub lowest: Option<RowCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension: Option<PensionSplit>,
    pub search: Option<String>,
    pub filtered_count: usize,
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    /// "Showing a-b of n entries".
    pub showing: String,
    pub page_window: Vec<usize>,
    pub rows: Vec<ViewRow>,
    pub unreconciled_count: u64,
}

fn population_phrase(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Senior => "senior citizen population",
        EntityKind::Pwd => "PWD population",
        EntityKind::Youth => "youth population",
    }
}

/// One sentence comparing a row's count with the municipal average.
pub fn insight(kind: EntityKind, count: u64, average: u64) -> Result<String, ReportError> {
    let noun = kind.noun();
    if count == average {
        return Ok(format!("This barangay has an average {}.", population_phrase(kind)));
    }
    let direction = if count > average { "more" } else { "fewer" };
    if average == 0 {
        return Ok(format!("This barangay has {direction} {noun} than the municipal average."));
    }
    let tenths = percent_tenths(count.abs_diff(average), average).map_err(|_| ReportError::Inconsistent("average"))?;
    Ok(format!(
        "This barangay has {}% {direction} {noun} than the municipal average.",
        format_tenths(tenths)
    ))
}

/// Up to [`PAGE_WINDOW`] page numbers centred on `page` (1-based), shifted to stay in range.
pub fn page_window(page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let mut start = page.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total_pages);
    if end + 1 - start < PAGE_WINDOW {
        start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);
    }
    (start..=end).collect()
}

/// "Showing a-b of n entries" for a 1-based page.
pub fn showing_line(page: usize, per_page: usize, filtered: usize) -> String {
    let start = if filtered == 0 { 0 } else { (page - 1) * per_page + 1 };
    let end = (page * per_page).min(filtered);
    format!("Showing {start}-{end} of {filtered} entries")
}

impl AnalyticsView {
    pub fn build(report: &EntityReport, opts: &ViewOptions) -> Result<Self, ReportError> {
        let kind = report.kind;
        let a = &report.analytics;
        let per_page = opts.per_page.max(1);

        let needle = opts
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let filtered: Vec<_> = report
            .reconciliation
            .rows
            .iter()
            .zip(&a.shares)
            .filter(|(row, _)| match &needle {
                Some(n) => row.name().to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();

        let filtered_count = filtered.len();
        let total_pages = filtered_count.div_ceil(per_page);
        let page = opts.page.clamp(1, total_pages.max(1));

        let rows = filtered
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(|(row, share)| {
                Ok(ViewRow {
                    name: row.name().to_string(),
                    count: row.matched_count,
                    population: row.barangay.reference_population,
                    percent: share.percent.clone(),
                    breakdown: row.breakdown.clone(),
                    pension: share.pension.clone(),
                    insight: insight(kind, row.matched_count, a.average)?,
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        Ok(AnalyticsView {
            entity: kind,
            program: kind.program(),
            total: a.total,
            average: a.average,
            highest: a.highest.clone(),
            lowest: a.lowest.clone(),
            pension: a.pension.clone(),
            search: needle,
            filtered_count,
            page,
            total_pages,
            per_page,
            showing: showing_line(page, per_page, filtered_count),
            page_window: page_window(page, total_pages),
            rows,
            unreconciled_count: report.reconciliation.unreconciled.total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgy_core::{AliasTable, BarangayCanonical, CanonicalRegistry};
    use bgy_pipeline::{run_entity, MemorySource};
    use serde_json::json;

    fn sixteen() -> CanonicalRegistry {
        let entries = (1..=16)
            .map(|i| BarangayCanonical::new(format!("Barangay {i}"), 10.8, 122.9, 1000))
            .collect();
        CanonicalRegistry::new(entries, AliasTable::new()).unwrap()
    }

    fn report(labels: &[&str]) -> EntityReport {
        let docs = labels.iter().map(|l| json!({"barangay": l, "gender": "Female"})).collect();
        let src = MemorySource::new().with(EntityKind::Pwd, docs);
        run_entity(&src, &sixteen(), EntityKind::Pwd).unwrap()
    }

    #[test]
    fn insight_sentences() {
        assert_eq!(
            insight(EntityKind::Senior, 3, 2).unwrap(),
            "This barangay has 50.0% more seniors than the municipal average."
        );
        assert_eq!(
            insight(EntityKind::Pwd, 1, 3).unwrap(),
            "This barangay has 66.7% fewer PWDs than the municipal average."
        );
        assert_eq!(insight(EntityKind::Senior, 2, 2).unwrap(), "This barangay has an average senior citizen population.");
        assert_eq!(
            insight(EntityKind::Youth, 1, 0).unwrap(),
            "This barangay has more youths than the municipal average."
        );
    }

    #[test]
    fn window_and_showing() {
        assert_eq!(page_window(1, 4), vec![1, 2, 3, 4]);
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert!(page_window(1, 0).is_empty());
        assert_eq!(showing_line(2, 5, 16), "Showing 6-10 of 16 entries");
        assert_eq!(showing_line(4, 5, 16), "Showing 16-16 of 16 entries");
        assert_eq!(showing_line(1, 5, 0), "Showing 0-0 of 0 entries");
    }

    #[test]
    fn paginates_registry_rows() {
        let r = report(&["Barangay 1", "Barangay 1", "Barangay 7"]);
        let v = AnalyticsView::build(&r, &ViewOptions { page: 2, ..Default::default() }).unwrap();
        assert_eq!(v.filtered_count, 16);
        assert_eq!(v.total_pages, 4);
        assert_eq!(v.rows.len(), 5);
        assert_eq!(v.rows[0].name, "Barangay 6");
        assert_eq!(v.rows[1].count, 1);
        assert_eq!(v.showing, "Showing 6-10 of 16 entries");
        assert_eq!(v.average, 0);
    }

    #[test]
    fn search_is_case_insensitive_and_pages_clamp() {
        let r = report(&["Barangay 1"]);
        let v = AnalyticsView::build(
            &r,
            &ViewOptions { search: Some("BARANGAY 1".into()), page: 9, per_page: 5 },
        )
        .unwrap();
        // Barangay 1, 10..=16
        assert_eq!(v.filtered_count, 8);
        assert_eq!(v.page, 2);
        assert_eq!(v.rows.len(), 3);
        assert_eq!(v.search.as_deref(), Some("barangay 1"));

        let none = AnalyticsView::build(&r, &ViewOptions { search: Some("patag".into()), ..Default::default() }).unwrap();
        assert!(none.rows.is_empty());
        assert_eq!(none.page, 1);
        assert_eq!(none.total_pages, 0);
        assert_eq!(none.showing, "Showing 0-0 of 0 entries");
    }
}
