//! `{success, data | message}` envelope and the two per-entity endpoints built on it.
//!
//! Failure messages are fixed per entity; the underlying error only goes to the log.

use serde::Serialize;

use bgy_algo::{DerivedAnalytics, ReconciledRow, UnreconciledReport};
use bgy_core::{CanonicalRegistry, EntityKind};
use bgy_io::source::ResidentSource;

use crate::run::{run_entity, EntityReport};
use crate::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}

/// Map layer payload: rows with coordinates and breakdown fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub entity: EntityKind,
    pub program: &'static str,
    pub barangays: Vec<ReconciledRow>,
    pub unreconciled: UnreconciledReport,
}

/// Analytics payload: rows plus derived figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsData {
    pub entity: EntityKind,
    pub program: &'static str,
    pub barangays: Vec<ReconciledRow>,
    #[serde(flatten)]
    pub analytics: DerivedAnalytics,
    pub unreconciled: UnreconciledReport,
}

impl From<EntityReport> for MapData {
    fn from(r: EntityReport) -> Self {
        MapData {
            entity: r.kind,
            program: r.kind.program(),
            barangays: r.reconciliation.rows,
            unreconciled: r.reconciliation.unreconciled,
        }
    }
}

impl From<EntityReport> for AnalyticsData {
    fn from(r: EntityReport) -> Self {
        AnalyticsData {
            entity: r.kind,
            program: r.kind.program(),
            barangays: r.reconciliation.rows,
            analytics: r.analytics,
            unreconciled: r.reconciliation.unreconciled,
        }
    }
}

pub fn map_failure_message(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Senior => "Failed to load senior map data",
        EntityKind::Pwd => "Failed to load PWD map data",
        EntityKind::Youth => "Failed to load Youth map data",
    }
}

pub fn analytics_failure_message(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Senior => "Failed to load OSCA analytics",
        EntityKind::Pwd => "Failed to load PDAO analytics",
        EntityKind::Youth => "Failed to load Youth analytics data",
    }
}

/// Wrap an already-computed run in the envelope; errors are logged, never exposed.
pub fn into_response<T>(
    kind: EntityKind,
    result: Result<EntityReport, PipelineError>,
    message: &'static str,
) -> ApiResponse<T>
where
    T: From<EntityReport>,
{
    match result {
        Ok(report) => ApiResponse::ok(T::from(report)),
        Err(e) => {
            tracing::error!(%kind, error = %e, "{message}");
            ApiResponse::fail(message)
        }
    }
}

fn respond<S, T>(
    source: &S,
    registry: &CanonicalRegistry,
    kind: EntityKind,
    message: &'static str,
) -> ApiResponse<T>
where
    S: ResidentSource + ?Sized,
    T: From<EntityReport>,
{
    into_response(kind, run_entity(source, registry, kind), message)
}

pub fn map_data<S>(source: &S, registry: &CanonicalRegistry, kind: EntityKind) -> ApiResponse<MapData>
where
    S: ResidentSource + ?Sized,
{
    respond(source, registry, kind, map_failure_message(kind))
}

pub fn analytics<S>(source: &S, registry: &CanonicalRegistry, kind: EntityKind) -> ApiResponse<AnalyticsData>
where
    S: ResidentSource + ?Sized,
{
    respond(source, registry, kind, analytics_failure_message(kind))
}
