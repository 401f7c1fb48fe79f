//! crates/bgy_io/src/lib.rs
//! I/O crate for the barangay engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Registry + manifest loading (offline, local JSON only).
//! - Resident document shapes with lenient field handling.
//! - `ResidentSource`: the single bulk-read seam the pipeline consumes.
//! - Canonical JSON writer for artifacts.

#![forbid(unsafe_code)]

use thiserror::Error;

use bgy_core::CoreError;

/// Unified error for bgy_io (registry/manifest/canonical_json).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Manifest shape or path-policy violations.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Registry content rejected by core validation.
    #[error("registry error: {0}")]
    Registry(#[from] CoreError),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column, not a pointer.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod canonical_json;
pub mod manifest;
pub mod registry;
pub mod residents;
pub mod source;

pub mod prelude {
    pub use crate::{looks_like_url_strict, IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::manifest::{load_manifest, Manifest, ResolvedManifest};
    pub use crate::registry::{builtin_registry, load_registry};
    pub use crate::residents::{PwdRecord, ResidentRecord, SeniorRecord, YouthRecord};
    pub use crate::source::{MemorySource, ResidentSource, SnapshotSource, SourceError};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection_is_strict() {
        assert!(looks_like_url_strict("https://example.org/a.json"));
        assert!(looks_like_url_strict(" file:///tmp/a.json"));
        assert!(!looks_like_url_strict("data/seniors.json"));
        assert!(!looks_like_url_strict("C:\\data\\pwd.json"));
    }

    #[test]
    fn serde_errors_map_to_json_variant() {
        let e: IoError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(e, IoError::Json { .. }));
    }
}
