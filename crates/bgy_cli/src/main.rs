// crates/bgy_cli/src/main.rs
//
// `bgy` entry point: parse → install subscriber → load inputs → run one
// command → emit envelope(s) → exit code.
//
// Upstream read failures still print the generic `{success:false, message}`
// envelope before exiting with UPSTREAM.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const UPSTREAM: i32 = 5;
}

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args, Command, Inputs, ViewFlags};

use bgy_core::roles::landing_route_for;
use bgy_core::EntityKind;
use bgy_io::canonical_json::{write_atomic, write_canonical_file};
use bgy_io::manifest::load_manifest;
use bgy_io::registry::{builtin_registry, load_registry};
use bgy_io::IoError;
use bgy_pipeline::{
    analytics_failure_message, census, into_response, map_data, run_all, run_entity,
    AnalyticsData, ApiResponse, CanonicalRegistry, ResidentSource, SnapshotSource,
};
use bgy_report::{render_html, render_view_json, AnalyticsView, ReportError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Registry / manifest / snapshot shape failures
    Validation(String),
    /// read/write/path errors
    Io(String),
    /// A resident collection could not be read (envelope already emitted)
    Upstream(String),
    /// View build or output
    Render(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Upstream(m) => write!(f, "upstream: {m}"),
            MainError::Render(m) => write!(f, "render: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("bgy: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    init_tracing(args.quiet);

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("bgy: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Upstream(_) => UPSTREAM,
        MainError::Render(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        e @ (IoError::Json { .. } | IoError::Manifest(_) | IoError::Registry(_) | IoError::Invalid(_)) => {
            MainError::Validation(e.to_string())
        }
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Render(e.to_string())
}

// ----- inputs -----

struct Loaded {
    registry: CanonicalRegistry,
    source: SnapshotSource,
}

/// Manifest mode or explicit mode; registry falls back to the embedded one.
fn load_inputs(inputs: &Inputs) -> Result<Loaded, MainError> {
    let (registry_path, source) = match &inputs.manifest {
        Some(manifest) => {
            let resolved = load_manifest(manifest).map_err(map_io_err)?;
            (resolved.registry_path.clone(), SnapshotSource::from_manifest(&resolved))
        }
        None => {
            let source = EntityKind::ALL.into_iter().fold(SnapshotSource::new(), |s, kind| {
                match inputs.snapshot(kind) {
                    Some(p) => s.with(kind, p),
                    None => s,
                }
            });
            (inputs.registry.clone(), source)
        }
    };

    let registry = match registry_path {
        Some(p) => load_registry(&p),
        None => builtin_registry(),
    }
    .map_err(map_io_err)?;

    Ok(Loaded { registry, source })
}

// ----- output -----

/// Pretty JSON on stdout, or a canonical artifact under `out`.
fn emit<T: Serialize>(out: Option<&Path>, file_name: &str, value: &T) -> Result<(), MainError> {
    match out {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", dir.display())))?;
            let path = dir.join(file_name);
            write_canonical_file(&path, value).map_err(|e| MainError::Io(format!("write {file_name}: {e}")))?;
            tracing::info!(path = %path.display(), "artifact written");
        }
        None => {
            let text = serde_json::to_string_pretty(value)
                .map_err(|e| MainError::Io(format!("encode {file_name}: {e}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn ensure_success<T>(resp: &ApiResponse<T>) -> Result<(), MainError> {
    if resp.success {
        return Ok(());
    }
    Err(MainError::Upstream(resp.message.clone().unwrap_or_default()))
}

// ----- commands -----

fn run(args: &Args) -> Result<(), MainError> {
    let out = args.command.out_dir();
    match &args.command {
        Command::Route { role } => {
            println!("{}", landing_route_for(role));
            Ok(())
        }
        Command::Validate { inputs } => validate_inputs(inputs, args.quiet),
        Command::Map { entity, inputs, .. } => {
            let l = load_inputs(inputs)?;
            let resp = map_data(&l.source, &l.registry, *entity);
            emit(out, &format!("map_{entity}.json"), &resp)?;
            ensure_success(&resp)
        }
        Command::Analytics { entity, inputs, view, .. } => {
            let l = load_inputs(inputs)?;
            analytics_cmd(&l, *entity, out, view)
        }
        Command::Census { entity, inputs, .. } => {
            let l = load_inputs(inputs)?;
            let kind = *entity;
            let resp = match census(&l.source, kind) {
                Ok(c) => ApiResponse::ok(c),
                Err(e) => {
                    tracing::error!(%kind, error = %e, "census failed");
                    ApiResponse::fail(format!("Failed to load {} census", kind.program()))
                }
            };
            emit(out, &format!("census_{kind}.json"), &resp)?;
            ensure_success(&resp)
        }
        Command::All { inputs, .. } => {
            let l = load_inputs(inputs)?;
            all_cmd(&l, out)
        }
    }
}

/// One bulk read; the same report feeds the envelope and any rendered view.
fn analytics_cmd(l: &Loaded, kind: EntityKind, out: Option<&Path>, flags: &ViewFlags) -> Result<(), MainError> {
    let result = run_entity(&l.source, &l.registry, kind);

    let view = match (&result, flags.render.is_empty()) {
        (Ok(report), false) => Some(AnalyticsView::build(report, &flags.options()).map_err(map_report_err)?),
        _ => None,
    };

    let resp: ApiResponse<AnalyticsData> = into_response(kind, result, analytics_failure_message(kind));
    emit(out, &format!("analytics_{kind}.json"), &resp)?;

    if let (Some(view), Some(dir)) = (view, out) {
        render_view(&view, &flags.render, dir)?;
    }
    ensure_success(&resp)
}

fn render_view(view: &AnalyticsView, formats: &[String], dir: &Path) -> Result<(), MainError> {
    for fmt in formats {
        let (name, bytes) = match fmt.as_str() {
            // Insertion order of the view sections is kept, so no canonical re-sort here.
            "json" => (
                "view.json",
                serde_json::to_vec_pretty(&render_view_json(view))
                    .map_err(|e| MainError::Render(format!("view.json: {e}")))?,
            ),
            "html" => ("report.html", render_html(view).into_bytes()),
            other => return Err(MainError::Render(format!("unknown renderer: {other}"))),
        };
        let path = dir.join(name);
        write_atomic(&path, &bytes).map_err(|e| MainError::Io(format!("write {name}: {e}")))?;
        tracing::info!(path = %path.display(), "view rendered");
    }
    Ok(())
}

fn all_cmd(l: &Loaded, out: Option<&Path>) -> Result<(), MainError> {
    let mut responses: BTreeMap<&'static str, ApiResponse<AnalyticsData>> = BTreeMap::new();
    let mut failed = Vec::new();
    for (kind, result) in run_all(&l.source, &l.registry) {
        let resp = into_response(kind, result, analytics_failure_message(kind));
        if !resp.success {
            failed.push(kind.as_str());
        }
        responses.insert(kind.as_str(), resp);
    }
    emit(out, "analytics_all.json", &responses)?;
    if failed.is_empty() {
        Ok(())
    } else {
        Err(MainError::Upstream(format!("no data for {}", failed.join(", "))))
    }
}

/// Registry + manifest + every configured snapshot must load; nothing is aggregated.
fn validate_inputs(inputs: &Inputs, quiet: bool) -> Result<(), MainError> {
    let l = load_inputs(inputs)?;
    let mut summary = vec![format!("registry OK ({} barangays, {} aliases)", l.registry.len(), l.registry.aliases().len())];
    for kind in EntityKind::ALL {
        if l.source.path(kind).is_none() {
            continue;
        }
        let docs = l
            .source
            .bulk_read(kind)
            .map_err(|e| MainError::Validation(e.to_string()))?;
        summary.push(format!("{kind}: {} documents", docs.len()));
    }
    if !quiet {
        eprintln!("validate: {}", summary.join("; "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_table() {
        assert_eq!(map_error(&MainError::Validation(String::new())), 2);
        assert_eq!(map_error(&MainError::Io(String::new())), 4);
        assert_eq!(map_error(&MainError::Render(String::new())), 4);
        assert_eq!(map_error(&MainError::Upstream(String::new())), 5);
    }

    #[test]
    fn io_errors_split_between_validation_and_io() {
        assert!(matches!(map_io_err(IoError::Path("gone".into())), MainError::Io(_)));
        assert!(matches!(map_io_err(IoError::Manifest("bad".into())), MainError::Validation(_)));
        assert!(matches!(
            map_io_err(IoError::Json { pointer: "/".into(), msg: "eof".into() }),
            MainError::Validation(_)
        ));
    }

    #[test]
    fn failed_envelope_maps_to_upstream() {
        let resp: ApiResponse<()> = ApiResponse::fail("Failed to load OSCA analytics");
        assert!(matches!(ensure_success(&resp), Err(MainError::Upstream(m)) if m == "Failed to load OSCA analytics"));
        assert!(ensure_success(&ApiResponse::ok(())).is_ok());
    }
}
