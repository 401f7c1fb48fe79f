//! Registry loader: local JSON file or the embedded Silay City registry.
//!
//! Wire shape:
//! `{ "name"?: str, "barangays": [{name, lat, lon, population}], "aliases"?: {alias: canonical} }`

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use bgy_core::{AliasTable, BarangayCanonical, CanonicalRegistry};

use crate::IoError;

/// Upper bound on any JSON input read from disk.
pub const MAX_JSON_BYTES: u64 = 64 * 1024 * 1024;

const BUILTIN_SILAY_CITY: &str = include_str!("../data/silay_city.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    #[serde(default)]
    name: Option<String>,
    barangays: Vec<BarangayCanonical>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Load and validate a registry file.
pub fn load_registry(path: &Path) -> Result<CanonicalRegistry, IoError> {
    let v = read_json_value_with_limits(path)?;
    let reg = registry_from_value(v)?;
    tracing::info!(path = %path.display(), barangays = reg.len(), aliases = reg.aliases().len(), "registry loaded");
    Ok(reg)
}

/// The embedded Silay City registry (16 barangays, no aliases).
pub fn builtin_registry() -> Result<CanonicalRegistry, IoError> {
    let v: Value = serde_json::from_str(BUILTIN_SILAY_CITY)?;
    registry_from_value(v)
}

/// Parse + validate an already-decoded registry document.
pub fn registry_from_value(v: Value) -> Result<CanonicalRegistry, IoError> {
    let raw: RegistryFile = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;
    let aliases: AliasTable = raw.aliases.iter().map(|(a, c)| (a.as_str(), c.clone())).collect();
    tracing::debug!(registry = raw.name.as_deref().unwrap_or("unnamed"), "validating registry");
    Ok(CanonicalRegistry::new(raw.barangays, aliases)?)
}

/// Read a JSON file into a `Value`, refusing inputs above [`MAX_JSON_BYTES`].
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let len = f.metadata()?.len();
    if len > MAX_JSON_BYTES {
        return Err(IoError::Invalid(format!(
            "{} is {len} bytes (limit {MAX_JSON_BYTES})",
            path.display()
        )));
    }
    let mut buf = Vec::with_capacity(len as usize);
    f.take(MAX_JSON_BYTES).read_to_end(&mut buf)?;
    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{}: {e}", path.display()),
    })
}
