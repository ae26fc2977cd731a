//! Decode-pack runner ingestion.
//!
//! The pack runner writes its own JSON report per run mode; when one is
//! present under the artifacts it is folded into the run payload as per-pack
//! engine summaries plus a run-weighted cross-pack aggregation. Absence is
//! normal (encode-only runs) and yields `None`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ReportError, Result};
use crate::schema::{PackEngineAggregate, PackEngineSummary, PackRunnerPayload, PackSummary};
use crate::RunMode;

const PACK_DIR: &str = "pack-runner";
const PACK_STEM: &str = "qr-decode-packs";

/// Scenarios at or above this expected rate are not worth calling out.
const FAILING_THRESHOLD: f64 = 0.9999;

/// First field present under any of the given names. The runner has emitted
/// both PascalCase and camelCase over time.
fn field<'a>(obj: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let map = obj.as_object()?;
    names.iter().find_map(|name| map.get(*name))
}

fn num(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Preferred report is the exact `qr-decode-packs-<mode>.json`; otherwise the
/// newest `qr-decode-packs-*-<mode>.json` by modification time.
fn find_pack_report(artifacts_path: &Path, run_mode: RunMode) -> Option<PathBuf> {
    let pack_dir = artifacts_path.join(PACK_DIR);
    if !pack_dir.is_dir() {
        return None;
    }
    let preferred = pack_dir.join(format!("{PACK_STEM}-{run_mode}.json"));
    if preferred.is_file() {
        return Some(preferred);
    }
    let suffix = format!("-{run_mode}.json");
    let prefix = format!("{PACK_STEM}-");
    let mut candidates: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(&pack_dir).ok()?.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(name.starts_with(&prefix) && name.ends_with(&suffix)) {
            continue;
        }
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
        candidates.push((mtime, path));
    }
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.into_iter().next().map(|(_, path)| path)
}

struct EngineAcc {
    name: String,
    is_external: bool,
    runs: f64,
    decode_weighted: f64,
    expected_weighted: f64,
    failing_scenarios: BTreeSet<String>,
    failing_packs: BTreeSet<String>,
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

/// Loads and aggregates the pack runner report for this run mode, if any.
pub fn load_pack_runner_payload(
    artifacts_path: &Path,
    run_mode: RunMode,
) -> Result<Option<PackRunnerPayload>> {
    let Some(report_path) = find_pack_report(artifacts_path, run_mode) else {
        return Ok(None);
    };
    let raw = fs::read_to_string(&report_path).map_err(|e| ReportError::io(&report_path, e))?;
    let stripped = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    let doc: Value =
        serde_json::from_str(stripped).map_err(|e| ReportError::json(&report_path, e))?;

    let mut engine_accs: Vec<EngineAcc> = Vec::new();
    let mut pack_summaries = Vec::new();

    let packs = field(&doc, &["Packs", "packs"])
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for pack in &packs {
        let pack_name =
            text(field(pack, &["Name", "name"])).unwrap_or_else(|| "unknown".to_string());
        let scenario_count = num(field(pack, &["ScenarioCount", "scenarioCount"])) as u64;
        let engines = field(pack, &["Engines", "engines"])
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut engine_summaries = Vec::new();
        for engine in &engines {
            let name =
                text(field(engine, &["Name", "name"])).unwrap_or_else(|| "unknown".to_string());
            let is_external = field(engine, &["IsExternal", "isExternal"])
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let runs = num(field(engine, &["Runs", "runs"]));
            let decode_rate = num(field(engine, &["DecodeRate", "decodeRate"]));
            let expected_rate = num(field(engine, &["ExpectedRate", "expectedRate"]));
            let median_ms = num(field(engine, &["MedianMs", "medianMs"]));
            let p95_ms = num(field(engine, &["P95Ms", "p95Ms"]));

            let mut failing_scenarios = Vec::new();
            let scenarios = field(engine, &["Scenarios", "scenarios"])
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for scenario in &scenarios {
                let scenario_expected = field(scenario, &["ExpectedRate", "expectedRate"])
                    .and_then(Value::as_f64)
                    .unwrap_or(1.0);
                if scenario_expected >= FAILING_THRESHOLD {
                    continue;
                }
                if let Some(scenario_name) = text(field(scenario, &["Name", "name"])) {
                    failing_scenarios.push(scenario_name);
                }
            }

            let pos = match engine_accs.iter().position(|a| a.name == name) {
                Some(pos) => pos,
                None => {
                    engine_accs.push(EngineAcc {
                        name: name.clone(),
                        is_external,
                        runs: 0.0,
                        decode_weighted: 0.0,
                        expected_weighted: 0.0,
                        failing_scenarios: BTreeSet::new(),
                        failing_packs: BTreeSet::new(),
                    });
                    engine_accs.len() - 1
                }
            };
            let acc = &mut engine_accs[pos];
            acc.runs += runs;
            acc.decode_weighted += decode_rate * runs;
            acc.expected_weighted += expected_rate * runs;
            if !failing_scenarios.is_empty() {
                acc.failing_scenarios
                    .extend(failing_scenarios.iter().cloned());
                acc.failing_packs.insert(pack_name.clone());
            }

            engine_summaries.push(PackEngineSummary {
                name,
                is_external,
                runs,
                decode_rate,
                expected_rate,
                median_ms,
                p95_ms,
                failing_scenarios,
            });
        }

        pack_summaries.push(PackSummary {
            name: pack_name,
            scenario_count,
            engines: engine_summaries,
        });
    }

    let mut engines: Vec<PackEngineAggregate> = engine_accs
        .into_iter()
        .map(|acc| {
            let rates = if acc.runs > 0.0 {
                (
                    Some(acc.decode_weighted / acc.runs),
                    Some(acc.expected_weighted / acc.runs),
                )
            } else {
                (None, None)
            };
            PackEngineAggregate {
                name: acc.name,
                is_external: acc.is_external,
                runs: acc.runs,
                decode_rate: rates.0,
                expected_rate: rates.1,
                failing_scenarios: acc.failing_scenarios.into_iter().collect(),
                failing_packs: acc.failing_packs.into_iter().collect(),
            }
        })
        .collect();
    engines.sort_by(|a, b| {
        (a.is_external, a.name.as_str()).cmp(&(b.is_external, b.name.as_str()))
    });

    let note_bits: Vec<String> = engines
        .iter()
        .map(|engine| {
            let mut bit = format!("{} expected={}", engine.name, fmt_pct(engine.expected_rate));
            let misses: Vec<&str> = engine
                .failing_scenarios
                .iter()
                .take(4)
                .map(String::as_str)
                .collect();
            if !misses.is_empty() {
                bit.push_str(&format!(" (misses: {})", misses.join(", ")));
            }
            bit
        })
        .collect();
    let note = if note_bits.is_empty() {
        None
    } else {
        Some(format!("QR pack runner ({run_mode}): {}", note_bits.join("; ")))
    };

    Ok(Some(PackRunnerPayload {
        report_path: report_path.display().to_string(),
        generated_utc: text(field(&doc, &["DateUtc", "dateUtc"])),
        mode: run_mode.as_str().to_string(),
        packs: pack_summaries,
        engines,
        note,
    }))
}
