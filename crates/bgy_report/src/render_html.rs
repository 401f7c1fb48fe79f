// crates/bgy_report/src/render_html.rs
//
// Deterministic, offline HTML renderer for one analytics view.
// Standalone page, no external assets; every content field is escaped.
// Section order: header → summary → table → pagination → unreconciled note.

use std::fmt::Write as _;

use bgy_core::Category;

use crate::view::AnalyticsView;

// ------------------------- formatting helpers -------------------------

/// Escape text for HTML (minimal, deterministic).
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Thousands separated with commas (1,234).
fn fmt_int(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ------------------------- renderer -------------------------

pub fn render_html(v: &AnalyticsView) -> String {
    let mut b = String::with_capacity(16 * 1024);
    let title = format!("{} analytics", v.program);

    // `write!` into a String cannot fail.
    let _ = write!(
        b,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>body{{font-family:sans-serif;margin:2rem}}table{{border-collapse:collapse}}\
         td,th{{border:1px solid #ccc;padding:.3rem .6rem}}td.num{{text-align:right}}</style>\n</head>\n<body>\n",
        esc(&title)
    );
    let _ = writeln!(b, "<h1>{}</h1>", esc(&title));

    // summary
    let _ = writeln!(b, "<section id=\"summary\">\n<ul>");
    let _ = writeln!(b, "<li>Total registered: {}</li>", fmt_int(v.total));
    let _ = writeln!(b, "<li>Average per barangay: {}</li>", fmt_int(v.average));
    if let Some(h) = &v.highest {
        let _ = writeln!(b, "<li>Highest: {} ({})</li>", esc(&h.name), fmt_int(h.count));
    }
    if let Some(l) = &v.lowest {
        let _ = writeln!(b, "<li>Lowest: {} ({})</li>", esc(&l.name), fmt_int(l.count));
    }
    if let Some(p) = &v.pension {
        let _ = writeln!(
            b,
            "<li>With pension: {} ({}%)</li>\n<li>Without pension: {} ({}%)</li>",
            fmt_int(p.with_pension),
            esc(&p.with_pension_percent),
            fmt_int(p.without_pension),
            esc(&p.without_pension_percent)
        );
    }
    let _ = writeln!(b, "</ul>\n</section>");

    // table
    let categories: &[Category] = v.entity.profile();
    if v.rows.is_empty() {
        let _ = writeln!(b, "<p class=\"no-results\">No barangays match the search.</p>");
    } else {
        let _ = write!(b, "<table>\n<thead><tr><th>Barangay</th><th>Count</th><th>Share</th>");
        for c in categories {
            let _ = write!(b, "<th>{}</th>", esc(c.label()));
        }
        if v.pension.is_some() {
            let _ = write!(b, "<th>Without pension</th><th>Pension %</th>");
        }
        let _ = writeln!(b, "<th>Insight</th></tr></thead>\n<tbody>");
        for r in &v.rows {
            let _ = write!(
                b,
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}%</td>",
                esc(&r.name),
                fmt_int(r.count),
                esc(&r.percent)
            );
            for c in categories {
                let _ = write!(b, "<td class=\"num\">{}</td>", fmt_int(r.breakdown.get(*c)));
            }
            if let Some(p) = &r.pension {
                let _ = write!(
                    b,
                    "<td class=\"num\">{}</td><td class=\"num\">{}%</td>",
                    fmt_int(p.without_pension),
                    esc(&p.pension_percentage)
                );
            }
            let _ = writeln!(b, "<td>{}</td></tr>", esc(&r.insight));
        }
        let _ = writeln!(b, "</tbody>\n</table>");
    }

    // pagination
    let _ = write!(b, "<nav id=\"pagination\"><span>{}</span>", esc(&v.showing));
    for p in &v.page_window {
        let class = if *p == v.page { " class=\"active\"" } else { "" };
        let _ = write!(b, " <span{class}>{p}</span>");
    }
    let _ = writeln!(b, "</nav>");

    if v.unreconciled_count > 0 {
        let _ = writeln!(
            b,
            "<p class=\"unreconciled\">{} record(s) carry a barangay label that matches no registered barangay and are not counted above.</p>",
            fmt_int(v.unreconciled_count)
        );
    }

    b.push_str("</body>\n</html>\n");
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewOptions;
    use bgy_core::{AliasTable, BarangayCanonical, CanonicalRegistry, EntityKind};
    use bgy_pipeline::{run_entity, MemorySource};
    use serde_json::json;

    #[test]
    fn escapes_and_thousands() {
        assert_eq!(esc("<b>\"E&Lopez\"</b>"), "&lt;b&gt;&quot;E&amp;Lopez&quot;&lt;/b&gt;");
        assert_eq!(fmt_int(0), "0");
        assert_eq!(fmt_int(999), "999");
        assert_eq!(fmt_int(1234567), "1,234,567");
    }

    #[test]
    fn renders_table_and_notes() {
        let reg = CanonicalRegistry::new(
            vec![BarangayCanonical::new("Barangay <E-Lopez>", 10.82060, 123.03538, 1800)],
            AliasTable::new(),
        )
        .unwrap();
        let src = MemorySource::new().with(
            EntityKind::Youth,
            vec![
                json!({"barangay": "barangay <e-lopez>", "gender": "Male", "voted_sk": "Yes"}),
                json!({"barangay": "Elsewhere"}),
            ],
        );
        let report = run_entity(&src, &reg, EntityKind::Youth).unwrap();
        let html = render_html(&AnalyticsView::build(&report, &ViewOptions::default()).unwrap());
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>LYDO analytics</title>"));
        assert!(html.contains("Barangay &lt;E-Lopez&gt;"));
        assert!(!html.contains("<E-Lopez>"));
        assert!(html.contains("<th>SK voted</th>"));
        assert!(html.contains("Showing 1-1 of 1 entries"));
        assert!(html.contains("1 record(s) carry a barangay label"));
        assert!(!html.contains("Pension %"));
    }

    #[test]
    fn senior_table_has_pension_columns() {
        let reg = CanonicalRegistry::new(
            vec![BarangayCanonical::new("Barangay Guimbala-on", 10.76, 123.01, 2100)],
            AliasTable::new(),
        )
        .unwrap();
        let src = MemorySource::new().with(
            EntityKind::Senior,
            vec![
                json!({"identifying_information": {"address": {"barangay": "Barangay Guimbala-on"}, "current_pension": "GSIS"}}),
                json!({"identifying_information": {"address": {"barangay": "Barangay Guimbala-on"}}}),
            ],
        );
        let report = run_entity(&src, &reg, EntityKind::Senior).unwrap();
        let html = render_html(&AnalyticsView::build(&report, &ViewOptions::default()).unwrap());
        assert!(html.contains("<th>Without pension</th><th>Pension %</th>"));
        assert!(html.contains("<td class=\"num\">1</td><td class=\"num\">50.0%</td>"));
    }
}
