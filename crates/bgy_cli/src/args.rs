// crates/bgy_cli/src/args.rs
//
// Offline CLI argument surface: subcommands, input mode, output and view flags.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --manifest XOR explicit inputs (--registry, --senior, --pwd, --youth)
// - Explicit mode without --registry uses the embedded Silay City registry
// - --render (analytics only) needs --out; --search/--page/--per-page need --render

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};

use bgy_core::{CoreError, EntityKind};
use bgy_report::ViewOptions;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "bgy",
    disable_help_subcommand = true,
    about = "Offline barangay reconciliation and analytics for OSCA, PDAO and LYDO records"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Only warnings and errors on stderr (RUST_LOG still wins when set).
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Map rows (coordinates, counts, breakdown) for one entity.
    Map {
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        output: Output,
    },
    /// Map rows plus totals, average, extremes and shares for one entity.
    Analytics {
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        output: Output,
        #[command(flatten)]
        view: ViewFlags,
    },
    /// Raw barangay labels in one collection, before any matching.
    Census {
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        output: Output,
    },
    /// Analytics for all three entities, run concurrently.
    All {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        output: Output,
    },
    /// Load registry, manifest and snapshots without building reports.
    Validate {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Landing route for a stored account role ("Admin", "Staff", "Super Admin", "Youth").
    Route { role: String },
}

/// Where the registry and resident snapshots come from.
#[derive(Debug, clap::Args, Clone, Default)]
pub struct Inputs {
    /// Manifest JSON naming the registry and snapshots (mutually exclusive with explicit file flags).
    #[arg(long, conflicts_with_all = ["registry", "senior", "pwd", "youth"])]
    pub manifest: Option<PathBuf>,

    /// Registry JSON path (default: embedded Silay City registry).
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Senior citizen snapshot (JSON array of documents).
    #[arg(long)]
    pub senior: Option<PathBuf>,
    /// PWD snapshot (JSON array of documents).
    #[arg(long)]
    pub pwd: Option<PathBuf>,
    /// Youth snapshot (JSON array of documents).
    #[arg(long)]
    pub youth: Option<PathBuf>,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct Output {
    /// Write canonical JSON artifacts here instead of printing to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Paged analytics view rendering.
#[derive(Debug, clap::Args, Clone, Default)]
pub struct ViewFlags {
    /// View renderer(s) to emit into --out (repeatable).
    #[arg(long, value_parser = ["json", "html"], requires = "out")]
    pub render: Vec<String>,
    /// Case-insensitive filter on barangay names.
    #[arg(long, requires = "render")]
    pub search: Option<String>,
    /// 1-based page (clamped into range).
    #[arg(long, requires = "render")]
    pub page: Option<usize>,
    #[arg(long, requires = "render")]
    pub per_page: Option<usize>,
}

impl Inputs {
    pub fn snapshot(&self, kind: EntityKind) -> Option<&Path> {
        match kind {
            EntityKind::Senior => self.senior.as_deref(),
            EntityKind::Pwd => self.pwd.as_deref(),
            EntityKind::Youth => self.youth.as_deref(),
        }
    }

    fn paths_mut(&mut self) -> [(&'static str, &mut Option<PathBuf>); 5] {
        [
            ("--manifest", &mut self.manifest),
            ("--registry", &mut self.registry),
            ("--senior", &mut self.senior),
            ("--pwd", &mut self.pwd),
            ("--youth", &mut self.youth),
        ]
    }
}

impl ViewFlags {
    pub fn options(&self) -> ViewOptions {
        let d = ViewOptions::default();
        ViewOptions {
            search: self.search.clone(),
            page: self.page.unwrap_or(d.page),
            per_page: self.per_page.unwrap_or(d.per_page),
        }
    }
}

impl Command {
    fn inputs_mut(&mut self) -> Option<&mut Inputs> {
        match self {
            Command::Map { inputs, .. }
            | Command::Analytics { inputs, .. }
            | Command::Census { inputs, .. }
            | Command::All { inputs, .. }
            | Command::Validate { inputs } => Some(inputs),
            Command::Route { .. } => None,
        }
    }

    pub fn out_dir(&self) -> Option<&Path> {
        match self {
            Command::Map { output, .. }
            | Command::Analytics { output, .. }
            | Command::Census { output, .. }
            | Command::All { output, .. } => output.out.as_deref(),
            Command::Validate { .. } | Command::Route { .. } => None,
        }
    }

    fn out_mut(&mut self) -> Option<&mut PathBuf> {
        match self {
            Command::Map { output, .. }
            | Command::Analytics { output, .. }
            | Command::Census { output, .. }
            | Command::All { output, .. } => output.out.as_mut(),
            Command::Validate { .. } | Command::Route { .. } => None,
        }
    }
}

/// Errors surfaced by argument validation. Messages are short and stable.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

fn parse_entity(s: &str) -> Result<EntityKind, String> {
    s.parse().map_err(|e: CoreError| format!("{e} (expected senior, pwd or youth)"))
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Local (no scheme) and an existing regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Scheme + existence checks on every input, then path normalization.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    if let Some(inputs) = args.command.inputs_mut() {
        for (label, slot) in inputs.paths_mut() {
            if let Some(p) = slot.as_mut() {
                ensure_local_exists(p, label)?;
                *p = normalize_path(p);
            }
        }
    }
    if let Some(out) = args.command.out_mut() {
        ensure_local_path(out)?;
        *out = normalize_path(out);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("bgy").chain(argv.iter().copied()))
    }

    #[test]
    fn entity_aliases_parse() {
        let a = parse(&["map", "OSCA"]).unwrap();
        assert!(matches!(a.command, Command::Map { entity: EntityKind::Senior, .. }));
        let a = parse(&["census", "pdao"]).unwrap();
        assert!(matches!(a.command, Command::Census { entity: EntityKind::Pwd, .. }));
        assert!(parse(&["map", "residents"]).is_err());
    }

    #[test]
    fn manifest_conflicts_with_explicit_inputs() {
        assert!(parse(&["map", "senior", "--manifest", "m.json", "--senior", "s.json"]).is_err());
        assert!(parse(&["all", "--manifest", "m.json", "--registry", "r.json"]).is_err());
        assert!(parse(&["all", "--registry", "r.json", "--youth", "y.json"]).is_ok());
    }

    #[test]
    fn view_flags_chain_to_out() {
        assert!(parse(&["analytics", "pwd", "--render", "html"]).is_err());
        assert!(parse(&["analytics", "pwd", "--search", "lantad"]).is_err());
        assert!(parse(&["analytics", "pwd", "--render", "pdf", "--out", "o"]).is_err());

        let a = parse(&[
            "analytics", "pwd", "--out", "o", "--render", "json", "--render", "html", "--search", "Lantad",
            "--page", "3",
        ])
        .unwrap();
        let Command::Analytics { view, .. } = a.command else { panic!("analytics expected") };
        assert_eq!(view.render, vec!["json", "html"]);
        let opts = view.options();
        assert_eq!(opts.search.as_deref(), Some("Lantad"));
        assert_eq!(opts.page, 3);
        assert_eq!(opts.per_page, ViewOptions::default().per_page);
    }

    #[test]
    fn quiet_is_global() {
        assert!(parse(&["validate", "--quiet"]).unwrap().quiet);
        assert!(parse(&["--quiet", "route", "Staff"]).unwrap().quiet);
    }

    #[test]
    fn ensure_local_path_rejects_schemes() {
        assert!(ensure_local_path(Path::new("http://x")).is_err());
        assert!(ensure_local_path(Path::new("file://C:/x.json")).is_err());
        assert!(ensure_local_path(Path::new("https://x/y.json")).is_err());
        assert!(ensure_local_path(Path::new(r"C:\local\file.json")).is_ok());
        assert!(ensure_local_path(Path::new("/tmp/file.json")).is_ok());
    }

    #[test]
    fn validate_rejects_missing_and_remote_inputs() {
        let a = parse(&["map", "youth", "--youth", "does/not/exist.json"]).unwrap();
        assert!(matches!(validate(a), Err(CliError::NotFound(_))));

        let a = parse(&["map", "youth", "--youth", "https://example.org/youth.json"]).unwrap();
        assert!(matches!(validate(a), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn validate_normalizes_out_dir() {
        let a = validate(parse(&["all", "--out", "not/yet/created"]).unwrap()).unwrap();
        assert!(a.command.out_dir().unwrap().is_absolute());
        let Command::All { inputs, .. } = &a.command else { panic!("all expected") };
        assert!(inputs.snapshot(EntityKind::Senior).is_none());
    }
}
