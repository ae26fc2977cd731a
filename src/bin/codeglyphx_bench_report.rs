use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use codeglyphx_bench_report::compare::{baseline_suite, comparison_suite, summary_items};
use codeglyphx_bench_report::packs::load_pack_runner_payload;
use codeglyphx_bench_report::records::{list_report_files, read_measurement_rows, report_stem};
use codeglyphx_bench_report::report::{self, SectionInput};
use codeglyphx_bench_report::runmeta::{
    build_meta, resolve_os_name, resolve_publish_flag, resolve_run_mode,
};
use codeglyphx_bench_report::schema::{BaselineSuite, RunPayload, SCHEMA_VERSION};
use codeglyphx_bench_report::{store, Catalog, OsName, ReportError, Result, RunMode};

#[derive(Parser, Debug)]
#[command(name = "codeglyphx-bench-report")]
#[command(about = "Aggregates benchmark suite CSVs into BENCHMARK.md and dashboard JSON")]
struct Args {
    /// Artifacts directory of one measurement run (expects a `results/` subfolder).
    #[arg(long, value_name = "DIR")]
    artifacts_path: PathBuf,

    /// Markdown report to splice this run's section into.
    #[arg(long, value_name = "FILE", default_value = "BENCHMARK.md")]
    output: PathBuf,

    /// Directory holding the JSON documents the website consumes.
    #[arg(long, value_name = "DIR", default_value = "assets/data")]
    data_dir: PathBuf,

    /// Target framework moniker recorded in the metadata.
    #[arg(long, default_value = "net8.0")]
    framework: String,

    /// Build configuration recorded in the metadata.
    #[arg(long, default_value = "Release")]
    configuration: String,

    /// Measurement intensity; inferred from the artifacts when omitted.
    #[arg(long, value_enum)]
    run_mode: Option<RunMode>,

    /// OS slot to update; inferred from the artifacts directory leaf or the
    /// host when omitted.
    #[arg(long, value_enum)]
    os_name: Option<OsName>,

    /// Commit the suites were built from.
    #[arg(long)]
    commit: Option<String>,

    /// Branch the suites were built from.
    #[arg(long)]
    branch: Option<String>,

    /// SDK version the suites were built with.
    #[arg(long = "dotnet-sdk")]
    dotnet_sdk: Option<String>,

    /// Runtime description recorded in the metadata.
    #[arg(long)]
    runtime: Option<String>,

    /// Tolerate missing compare suites instead of failing the run.
    #[arg(long, default_value_t = false)]
    allow_partial: bool,

    /// Force publish=true regardless of run mode.
    #[arg(long, default_value_t = false)]
    publish: bool,

    /// Force publish=false regardless of run mode.
    #[arg(long, default_value_t = false)]
    no_publish: bool,

    /// Check for missing compare suites even with --allow-partial.
    #[arg(long, default_value_t = false)]
    fail_on_missing_compare: bool,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

struct LoadedSuite {
    id: String,
    title: String,
    rows: Vec<codeglyphx_bench_report::records::MeasurementRow>,
}

/// Reads each report file, dropping header-only suites. The suite id and
/// display title come from the file stem via the catalog.
fn load_suites(catalog: &Catalog, paths: &[PathBuf]) -> Result<Vec<LoadedSuite>> {
    let mut suites = Vec::new();
    for path in paths {
        let rows = read_measurement_rows(path)?;
        if rows.is_empty() {
            continue;
        }
        let id = catalog.suite_id(&report_stem(path));
        let title = catalog.title_for(&id).to_string();
        suites.push(LoadedSuite { id, title, rows });
    }
    Ok(suites)
}

fn run(args: Args) -> Result<()> {
    let catalog = Catalog::default();

    let results_dir = args.artifacts_path.join("results");
    if !results_dir.is_dir() {
        return Err(ReportError::ResultsDirMissing(results_dir));
    }

    let os = resolve_os_name(&args.artifacts_path, args.os_name)?;
    let resolution = resolve_run_mode(args.run_mode, &results_dir);
    if let Some(warning) = &resolution.warning {
        eprintln!("WARNING: {warning}");
    }
    let run_mode = resolution.run_mode;
    let publish = resolve_publish_flag(run_mode, args.publish, args.no_publish);
    let strict = args.fail_on_missing_compare || !args.allow_partial;
    let meta = build_meta(
        args.commit.clone(),
        args.branch.clone(),
        args.dotnet_sdk.clone(),
        args.runtime.clone(),
    );

    let (baseline_files, compare_files) = list_report_files(&results_dir)?;

    // Missing-compare checks count files by name; an empty file is present,
    // it just contributes no tables.
    let actual_compare_ids: Vec<String> = compare_files
        .iter()
        .map(|p| catalog.suite_id(&report_stem(p)))
        .collect();
    let (missing_titles, missing_ids) = catalog.missing_compare(&actual_compare_ids);

    let baseline: Vec<BaselineSuite> = load_suites(&catalog, &baseline_files)?
        .iter()
        .map(|suite| baseline_suite(&catalog, &suite.id, &suite.title, &suite.rows))
        .collect();
    let compare_suites = load_suites(&catalog, &compare_files)?;
    let comparisons: Vec<_> = compare_suites
        .iter()
        .map(|suite| comparison_suite(&catalog, &suite.id, &suite.title, &suite.rows))
        .collect();
    let summary: Vec<_> = compare_suites
        .iter()
        .flat_map(|suite| summary_items(&catalog, &suite.title, &suite.rows))
        .collect();

    let pack_runner = load_pack_runner_payload(&args.artifacts_path, run_mode)?;

    let now = Utc::now();
    let mut notes = vec![resolution.details.clone()];
    notes.extend(report::methodology_notes());
    if let Some(note) = pack_runner.as_ref().and_then(|p| p.note.clone()) {
        notes.push(note);
    }

    let payload = RunPayload {
        generated_utc: now.to_rfc3339(),
        schema_version: SCHEMA_VERSION,
        os: os.as_str().to_string(),
        framework: args.framework.clone(),
        configuration: args.configuration.clone(),
        run_mode: run_mode.as_str().to_string(),
        run_mode_details: resolution.details.clone(),
        run_mode_source: resolution.source.as_str().to_string(),
        publish,
        artifacts: args.artifacts_path.display().to_string(),
        meta,
        missing_comparisons: missing_titles.clone(),
        missing_comparison_ids: missing_ids,
        how_to_read: report::how_to_read_lines(),
        notes,
        summary,
        baseline,
        comparisons,
        pack_runner,
    };

    let section = report::build_section(
        &catalog,
        &SectionInput {
            os,
            timestamp: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            framework: &args.framework,
            configuration: &args.configuration,
            artifacts: &payload.artifacts,
            run_mode_details: &resolution.details,
            run_mode_warning: resolution.warning.as_deref(),
            missing_compare_titles: &missing_titles,
            summary: &payload.summary,
            baseline: &payload.baseline,
            comparisons: &payload.comparisons,
        },
    );
    report::splice_section(&args.output, &section, os, run_mode)?;

    store::update_run_store(
        &args.data_dir.join("benchmark.json"),
        os,
        run_mode,
        serde_json::to_value(&payload)?,
    )?;
    store::update_run_store(
        &args.data_dir.join("benchmark-summary.json"),
        os,
        run_mode,
        serde_json::to_value(payload.to_summary())?,
    )?;
    store::update_index_store(
        &args.data_dir.join("benchmark-index.json"),
        os,
        run_mode,
        serde_json::to_value(payload.to_index_entry())?,
    )?;

    // Artifacts are written first so a partial run is still inspectable; the
    // failure only flips the exit status.
    if strict && !missing_titles.is_empty() {
        return Err(ReportError::MissingCompare(missing_titles.join(", ")));
    }
    Ok(())
}
