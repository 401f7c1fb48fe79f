//! bgy_pipeline: per-entity orchestration (bulk read → parse → aggregate → reconcile → analytics).
//! I/O stays behind `bgy_io::source::ResidentSource`; math lives in `bgy_algo`.

#![forbid(unsafe_code)]

use thiserror::Error;

use bgy_core::{CoreError, EntityKind};
use bgy_io::{source::SourceError, IoError};

pub mod census;
pub mod response;
pub mod run;

pub use census::{census, Census, LabelCount};
pub use response::{
    analytics, analytics_failure_message, into_response, map_data, map_failure_message, AnalyticsData, ApiResponse,
    MapData,
};
pub use run::{run_all, run_entity, EntityReport};

// Callers only need this crate to drive a run.
pub use bgy_core::CanonicalRegistry;
pub use bgy_io::source::{MemorySource, ResidentSource, SnapshotSource};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The one bulk read failed; never retried.
    #[error("upstream read failed: {0}")]
    Upstream(#[from] SourceError),

    #[error("io: {0}")]
    Io(String),

    #[error("validate: {0}")]
    Validate(String),

    #[error("analytics: {0}")]
    Analytics(#[from] CoreError),

    /// A concurrent entity run panicked.
    #[error("{0} worker panicked")]
    Worker(EntityKind),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        use PipelineError::*;
        match e {
            IoError::Path(m) => Io(format!("path: {m}")),
            IoError::Json { pointer, msg } => Validate(format!("json {pointer}: {msg}")),
            IoError::Manifest(m) => Validate(format!("manifest: {m}")),
            IoError::Registry(c) => Validate(format!("registry: {c}")),
            IoError::Invalid(m) => Validate(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_stable_buckets() {
        let e: PipelineError = IoError::Manifest("bad".into()).into();
        assert_eq!(e.to_string(), "validate: manifest: bad");
        let e: PipelineError = IoError::Path("gone".into()).into();
        assert!(matches!(e, PipelineError::Io(_)));
        let e: PipelineError = SourceError::Unavailable(EntityKind::Youth).into();
        assert_eq!(e.to_string(), "upstream read failed: no youth collection configured");
    }
}
