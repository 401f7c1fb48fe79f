// crates/bgy_io/src/manifest.rs
//
// Run manifest: which registry and which resident snapshots a run reads.
//
// • Paths only; relative paths resolve against the manifest's directory.
// • Offline-only: reject any path with a scheme ("://", "http:", "https:").
// • `registry_path` is optional; absent means the embedded registry.
// • Snapshot paths are optional per entity; a run for an entity without a
//   snapshot fails as an upstream read, not as a manifest error.
// • Present paths must exist and be files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bgy_core::EntityKind;

use crate::registry::read_json_value_with_limits;
use crate::{looks_like_url_strict, IoError};

/// External manifest accepted by the loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Optional user-provided identifier (non-normative, logged only).
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub registry_path: Option<String>,
    #[serde(default)]
    pub senior_path: Option<String>,
    #[serde(default)]
    pub pwd_path: Option<String>,
    #[serde(default)]
    pub youth_path: Option<String>,
}

impl Manifest {
    fn snapshot(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Senior => self.senior_path.as_deref(),
            EntityKind::Pwd => self.pwd_path.as_deref(),
            EntityKind::Youth => self.youth_path.as_deref(),
        }
    }
}

/// Paths resolved against the manifest's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub registry_path: Option<PathBuf>,
    pub senior_path: Option<PathBuf>,
    pub pwd_path: Option<PathBuf>,
    pub youth_path: Option<PathBuf>,
}

impl ResolvedManifest {
    pub fn snapshot(&self, kind: EntityKind) -> Option<&Path> {
        match kind {
            EntityKind::Senior => self.senior_path.as_deref(),
            EntityKind::Pwd => self.pwd_path.as_deref(),
            EntityKind::Youth => self.youth_path.as_deref(),
        }
    }

    fn snapshot_mut(&mut self, kind: EntityKind) -> &mut Option<PathBuf> {
        match kind {
            EntityKind::Senior => &mut self.senior_path,
            EntityKind::Pwd => &mut self.pwd_path,
            EntityKind::Youth => &mut self.youth_path,
        }
    }
}

// ---------- helpers (pure) ----------

#[inline]
fn has_any_scheme(s: &str) -> bool {
    looks_like_url_strict(s) || s.starts_with("http:") || s.starts_with("https:")
}

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn field_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Senior => "senior_path",
        EntityKind::Pwd => "pwd_path",
        EntityKind::Youth => "youth_path",
    }
}

fn check_path_field(label: &str, value: &str) -> Result<(), IoError> {
    if value.trim().is_empty() {
        return Err(IoError::Manifest(format!("field must not be empty: {label}")));
    }
    if has_any_scheme(value) {
        return Err(IoError::Manifest(format!("path must be offline (no scheme) for {label}: {value}")));
    }
    Ok(())
}

// ---------- validation + resolution ----------

/// Validate manifest shape and offline path policy. No I/O.
pub fn validate_manifest(man: &Manifest) -> Result<(), IoError> {
    if let Some(p) = &man.registry_path {
        check_path_field("registry_path", p)?;
    }
    for kind in EntityKind::ALL {
        if let Some(p) = man.snapshot(kind) {
            check_path_field(field_label(kind), p)?;
        }
    }
    Ok(())
}

/// Resolve present paths under `base_dir` and require each to be an existing file.
pub fn resolve_paths(base_dir: &Path, man: &Manifest) -> Result<ResolvedManifest, IoError> {
    let mut out = ResolvedManifest::default();
    if let Some(p) = &man.registry_path {
        let full = join_under(base_dir, p);
        must_exist_file("registry_path", &full)?;
        out.registry_path = Some(full);
    }
    for kind in EntityKind::ALL {
        if let Some(p) = man.snapshot(kind) {
            let full = join_under(base_dir, p);
            must_exist_file(field_label(kind), &full)?;
            *out.snapshot_mut(kind) = Some(full);
        }
    }
    Ok(out)
}

fn must_exist_file(label: &str, p: &Path) -> Result<(), IoError> {
    let md = fs::metadata(p)
        .map_err(|e| IoError::Manifest(format!("cannot access {label}: {} ({e})", p.display())))?;
    if !md.is_file() {
        return Err(IoError::Manifest(format!("path is not a file for {label}: {}", p.display())));
    }
    Ok(())
}

/// Read → parse (`deny_unknown_fields`) → validate → resolve relative to the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<ResolvedManifest, IoError> {
    let v = read_json_value_with_limits(path)?;
    let man: Manifest = serde_json::from_value(v)
        .map_err(|e| IoError::Manifest(format!("{}: {e}", path.display())))?;
    validate_manifest(&man)?;
    let base = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let resolved = resolve_paths(&base, &man)?;
    tracing::info!(
        manifest = %path.display(),
        id = man.id.as_deref().unwrap_or("-"),
        custom_registry = resolved.registry_path.is_some(),
        "manifest loaded"
    );
    Ok(resolved)
}
