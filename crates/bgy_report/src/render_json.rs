//! render_json.rs
//! View JSON renderer (summary → pagination → rows).
//!
//! Key order is insertion order of `serde_json::Map`; the workspace enables
//! `preserve_order` so the sections come out in the order built here.

use serde_json::{json, Map as JsonMap, Value};

use crate::view::{AnalyticsView, ViewRow};

pub fn render_view_json(v: &AnalyticsView) -> Value {
    let mut root = obj();
    root.insert("entity".into(), Value::String(v.entity.as_str().into()));
    root.insert("program".into(), Value::String(v.program.into()));
    root.insert("summary".into(), summary_json(v));
    root.insert("pagination".into(), pagination_json(v));
    root.insert("rows".into(), Value::Array(v.rows.iter().map(row_json).collect()));
    Value::Object(root)
}

fn summary_json(v: &AnalyticsView) -> Value {
    let mut o = obj();
    o.insert("total".into(), json!(v.total));
    o.insert("average".into(), json!(v.average));
    o.insert("highest".into(), json!(v.highest));
    o.insert("lowest".into(), json!(v.lowest));
    if let Some(p) = &v.pension {
        o.insert("pension".into(), json!(p));
    }
    o.insert("unreconciledCount".into(), json!(v.unreconciled_count));
    Value::Object(o)
}

fn pagination_json(v: &AnalyticsView) -> Value {
    let mut o = obj();
    if let Some(s) = &v.search {
        o.insert("search".into(), Value::String(s.clone()));
    }
    o.insert("page".into(), json!(v.page));
    o.insert("perPage".into(), json!(v.per_page));
    o.insert("totalPages".into(), json!(v.total_pages));
    o.insert("filteredCount".into(), json!(v.filtered_count));
    o.insert("showing".into(), Value::String(v.showing.clone()));
    o.insert("pageWindow".into(), json!(v.page_window));
    Value::Object(o)
}

fn row_json(r: &ViewRow) -> Value {
    let mut o = obj();
    o.insert("name".into(), Value::String(r.name.clone()));
    o.insert("count".into(), json!(r.count));
    o.insert("percent".into(), Value::String(r.percent.clone()));
    o.insert("population".into(), json!(r.population));
    o.insert("breakdown".into(), json!(r.breakdown));
    if let Some(p) = &r.pension {
        o.insert("withoutPension".into(), json!(p.without_pension));
        o.insert("pensionPercentage".into(), Value::String(p.pension_percentage.clone()));
    }
    o.insert("insight".into(), Value::String(r.insight.clone()));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}
