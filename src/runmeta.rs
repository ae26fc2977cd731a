//! Run context: environment metadata, OS and run-mode resolution, publish
//! flag policy.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ReportError, Result};
use crate::schema::EnvMeta;
use crate::{OsName, RunMode};

/// Iteration settings the quick profile pins in the measurement harness.
const QUICK_ITERATIONS: u64 = 3;
const QUICK_WARMUPS: u64 = 1;

static COUNTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(IterationCount|WarmupCount|InvocationCount)\s*=\s*(\d+)").unwrap());

/// Best-effort environment snapshot carried verbatim into all artifacts.
///
/// Flags win over environment variables; everything is optional except the
/// host description fields.
pub fn build_meta(
    commit: Option<String>,
    branch: Option<String>,
    dotnet_sdk: Option<String>,
    runtime: Option<String>,
) -> EnvMeta {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    EnvMeta {
        commit: commit
            .or_else(|| env("GIT_COMMIT"))
            .or_else(|| env("BUILD_SOURCEVERSION")),
        branch: branch
            .or_else(|| env("GIT_BRANCH"))
            .or_else(|| env("BUILD_SOURCEBRANCH")),
        dotnet_sdk: dotnet_sdk.or_else(|| env("DOTNET_SDK")),
        runtime,
        os_description: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        os_architecture: std::env::consts::ARCH.to_string(),
        process_architecture: std::env::consts::ARCH.to_string(),
        machine_name: env("HOSTNAME").or_else(|| env("COMPUTERNAME")),
        processor_count: std::thread::available_parallelism().ok().map(|n| n.get()),
    }
}

/// Resolves the OS slot to update: explicit flag, then the artifacts
/// directory leaf (`windows-x64` style), then the host OS.
pub fn resolve_os_name(artifacts_path: &Path, requested: Option<OsName>) -> Result<OsName> {
    if let Some(os) = requested {
        return Ok(os);
    }
    if let Some(leaf) = artifacts_path.file_name().and_then(|n| n.to_str()) {
        let leaf = leaf.to_ascii_lowercase();
        for candidate in OsName::ALL {
            if leaf.starts_with(&format!("{}-", candidate.as_str())) {
                return Ok(candidate);
            }
        }
    }
    OsName::from_host()
        .ok_or_else(|| ReportError::UnsupportedHostOs(std::env::consts::OS.to_string()))
}

/// How the effective run mode was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunModeSource {
    Explicit,
    Inferred,
    InferredMismatch,
    EnvDefault,
}

impl RunModeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunModeSource::Explicit => "explicit",
            RunModeSource::Inferred => "inferred",
            RunModeSource::InferredMismatch => "inferred-mismatch",
            RunModeSource::EnvDefault => "env-default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunModeResolution {
    pub run_mode: RunMode,
    pub source: RunModeSource,
    /// Human-readable line for notes sections.
    pub details: String,
    /// Non-fatal mismatch between requested and inferred mode.
    pub warning: Option<String>,
}

/// Resolves the effective run mode. The artifacts win over the request: a
/// mismatch downgrades to a warning and the inferred mode is used, so the
/// stored slot always matches what was actually measured.
pub fn resolve_run_mode(requested: Option<RunMode>, results_dir: &Path) -> RunModeResolution {
    let inferred = infer_run_mode(results_dir);
    let mut warning = None;

    let (run_mode, source) = match (requested, inferred) {
        (Some(req), Some(inf)) if req != inf => {
            warning = Some(format!(
                "Run mode mismatch: requested {req}, inferred {inf} from artifacts."
            ));
            (inf, RunModeSource::InferredMismatch)
        }
        (Some(req), _) => (req, RunModeSource::Explicit),
        (None, Some(inf)) => (inf, RunModeSource::Inferred),
        (None, None) => {
            let mode = if std::env::var("BENCH_QUICK").as_deref() == Ok("true") {
                RunMode::Quick
            } else {
                RunMode::Full
            };
            (mode, RunModeSource::EnvDefault)
        }
    };

    let details = format_run_mode(run_mode, source, requested);
    RunModeResolution {
        run_mode,
        source,
        details,
        warning,
    }
}

fn format_run_mode(mode: RunMode, source: RunModeSource, requested: Option<RunMode>) -> String {
    let label = match mode {
        RunMode::Quick => {
            "Run mode: Quick (warmupCount=1, iterationCount=3, invocationCount=1)."
        }
        RunMode::Full => "Run mode: Full (harness default job settings).",
    };
    match source {
        RunModeSource::Inferred | RunModeSource::InferredMismatch => match requested {
            Some(req) if req != mode => {
                format!("{label} (inferred from artifacts; requested {req}).")
            }
            _ => format!("{label} (inferred from artifacts)."),
        },
        _ => label.to_string(),
    }
}

/// Infers the run mode from the measurement harness' own markdown reports,
/// which record the job's iteration settings. First report with both counts
/// decides.
fn infer_run_mode(results_dir: &Path) -> Option<RunMode> {
    let mut candidates = markdown_reports(results_dir, "-report-github.md");
    if candidates.is_empty() {
        candidates = markdown_reports(results_dir, "-report.md");
    }
    for path in candidates {
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        let mut counts: HashMap<String, u64> = HashMap::new();
        for caps in COUNTS_RE.captures_iter(&text) {
            if let Ok(value) = caps[2].parse() {
                counts.insert(caps[1].to_ascii_lowercase(), value);
            }
        }
        let (Some(&iterations), Some(&warmups)) =
            (counts.get("iterationcount"), counts.get("warmupcount"))
        else {
            continue;
        };
        let invocations = counts.get("invocationcount").copied();
        let quick = iterations == QUICK_ITERATIONS
            && warmups == QUICK_WARMUPS
            && invocations.map_or(true, |v| v == 1);
        return Some(if quick { RunMode::Quick } else { RunMode::Full });
    }
    None
}

fn markdown_reports(results_dir: &Path, suffix: &str) -> Vec<std::path::PathBuf> {
    let Ok(entries) = fs::read_dir(results_dir) else {
        return Vec::new();
    };
    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    paths.sort();
    paths
}

/// Quick runs are drafts by default; full runs publish unless overridden.
pub fn resolve_publish_flag(run_mode: RunMode, publish: bool, no_publish: bool) -> bool {
    if publish {
        return true;
    }
    if no_publish {
        return false;
    }
    run_mode == RunMode::Full
}
