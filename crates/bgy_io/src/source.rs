//! Resident sources: the one bulk read a report performs per entity.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use bgy_core::EntityKind;

use crate::manifest::ResolvedManifest;
use crate::registry::read_json_value_with_limits;

#[derive(Debug, Error)]
pub enum SourceError {
    /// No collection configured for this entity.
    #[error("no {0} collection configured")]
    Unavailable(EntityKind),

    /// The collection exists but could not be read.
    #[error("reading {kind} collection: {msg}")]
    Read { kind: EntityKind, msg: String },

    /// The collection was read but is not a list of documents.
    #[error("{kind} collection is not a JSON array of documents")]
    Malformed { kind: EntityKind },
}

/// Bulk read of every stored document of one entity kind, in storage order.
pub trait ResidentSource {
    fn bulk_read(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError>;
}

impl<S: ResidentSource + ?Sized> ResidentSource for &S {
    fn bulk_read(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        (**self).bulk_read(kind)
    }
}

// ----- JSON snapshot files ----------------------------------------------------------------------

/// One JSON array file per entity kind.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    paths: BTreeMap<EntityKind, PathBuf>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: EntityKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    pub fn from_manifest(m: &ResolvedManifest) -> Self {
        let mut s = Self::new();
        for kind in EntityKind::ALL {
            if let Some(p) = m.snapshot(kind) {
                s = s.with(kind, p);
            }
        }
        s
    }

    pub fn path(&self, kind: EntityKind) -> Option<&Path> {
        self.paths.get(&kind).map(PathBuf::as_path)
    }
}

impl ResidentSource for SnapshotSource {
    fn bulk_read(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        let path = self.paths.get(&kind).ok_or(SourceError::Unavailable(kind))?;
        let v = read_json_value_with_limits(path)
            .map_err(|e| SourceError::Read { kind, msg: e.to_string() })?;
        match v {
            Value::Array(docs) => {
                tracing::debug!(%kind, path = %path.display(), documents = docs.len(), "snapshot read");
                Ok(docs)
            }
            _ => Err(SourceError::Malformed { kind }),
        }
    }
}

// ----- In-memory --------------------------------------------------------------------------------

/// Fixed documents per entity; a kind can be set to fail to exercise the error envelope.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: BTreeMap<EntityKind, Result<Vec<Value>, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: EntityKind, docs: Vec<Value>) -> Self {
        self.collections.insert(kind, Ok(docs));
        self
    }

    pub fn failing(mut self, kind: EntityKind, msg: impl Into<String>) -> Self {
        self.collections.insert(kind, Err(msg.into()));
        self
    }
}

impl ResidentSource for MemorySource {
    fn bulk_read(&self, kind: EntityKind) -> Result<Vec<Value>, SourceError> {
        match self.collections.get(&kind) {
            Some(Ok(docs)) => Ok(docs.clone()),
            Some(Err(msg)) => Err(SourceError::Read { kind, msg: msg.clone() }),
            None => Err(SourceError::Unavailable(kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::fs;

    #[test]
    fn snapshot_reads_array() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("pwd.json");
        fs::write(&p, r#"[{"barangay":"Barangay 1","gender":"Male"},{"barangay":null}]"#).unwrap();
        let src = SnapshotSource::new().with(EntityKind::Pwd, &p);
        let docs = src.bulk_read(EntityKind::Pwd).unwrap();
        assert_json_eq!(Value::Array(docs), json!([{"barangay":"Barangay 1","gender":"Male"},{"barangay":null}]));
    }

    #[test]
    fn snapshot_errors() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("youth.json");
        fs::write(&p, r#"{"barangay":"x"}"#).unwrap();
        let src = SnapshotSource::new()
            .with(EntityKind::Youth, &p)
            .with(EntityKind::Senior, dir.path().join("missing.json"));
        assert!(matches!(src.bulk_read(EntityKind::Youth), Err(SourceError::Malformed { .. })));
        assert!(matches!(src.bulk_read(EntityKind::Senior), Err(SourceError::Read { .. })));
        assert!(matches!(src.bulk_read(EntityKind::Pwd), Err(SourceError::Unavailable(EntityKind::Pwd))));
    }

    #[test]
    fn memory_source_can_fail() {
        let src = MemorySource::new()
            .with(EntityKind::Pwd, vec![json!({})])
            .failing(EntityKind::Senior, "quota exceeded");
        assert_eq!(src.bulk_read(EntityKind::Pwd).unwrap().len(), 1);
        let err = src.bulk_read(EntityKind::Senior).unwrap_err();
        assert_eq!(err.to_string(), "reading senior collection: quota exceeded");
    }
}
