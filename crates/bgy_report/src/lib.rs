//! bgy_report/src/lib.rs: Pure offline presentation (view model + JSON/HTML renderers).
//!
//! Determinism rules:
//! - No network, no I/O here. Callers supply reports already in memory.
//! - Percent strings come from integer tenths; no float formatting.
//! - Stable section order and field names.

#![deny(unsafe_code)]

use core::fmt;

pub mod render_html;
pub mod render_json;
pub mod view;

pub use render_html::render_html;
pub use render_json::render_view_json;
pub use view::{AnalyticsView, ViewOptions, ViewRow};

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Inconsistent(what) => write!(f, "inconsistent report field: {what}"),
        }
    }
}

impl std::error::Error for ReportError {}
