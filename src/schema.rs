//! Wire types for the persisted JSON artifacts.
//!
//! Field names are the published dashboard schema (camelCase); changing them
//! breaks the static website that consumes these documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Qualitative rating of the subject vendor for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Ok,
    Bad,
    Unknown,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Ok => "ok",
            Rating::Bad => "bad",
            Rating::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment metadata captured once per run and carried into all artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvMeta {
    pub commit: Option<String>,
    pub branch: Option<String>,
    pub dotnet_sdk: Option<String>,
    pub runtime: Option<String>,
    pub os_description: String,
    pub os_architecture: String,
    pub process_architecture: String,
    pub machine_name: Option<String>,
    pub processor_count: Option<usize>,
}

/// One vendor's measurement for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCell {
    pub mean: String,
    pub mean_ns: Option<f64>,
    pub allocated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineScenario {
    pub name: String,
    pub mean: String,
    pub mean_ns: Option<f64>,
    pub allocated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSuite {
    pub id: String,
    pub title: String,
    pub scenarios: Vec<BaselineScenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonScenario {
    pub name: String,
    pub vendors: BTreeMap<String, VendorCell>,
    /// Competitor mean divided by the subject mean, present only when the
    /// subject itself parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSuite {
    pub id: String,
    pub title: String,
    pub scenarios: Vec<ComparisonScenario>,
}

/// One flattened summary row: the subject vendor against the fastest vendor
/// for a single scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    pub benchmark: String,
    pub scenario: String,
    pub fastest_vendor: String,
    pub fastest_mean: String,
    pub code_glyph_x_mean: String,
    pub code_glyph_x_alloc: String,
    pub code_glyph_x_vs_fastest: Option<f64>,
    pub code_glyph_x_vs_fastest_text: String,
    pub code_glyph_x_alloc_vs_fastest: Option<f64>,
    pub code_glyph_x_alloc_vs_fastest_text: String,
    pub rating: Rating,
}

/// Detailed-store slot: the full result set for one (os, runMode) key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
    pub generated_utc: String,
    pub schema_version: u32,
    pub os: String,
    pub framework: String,
    pub configuration: String,
    pub run_mode: String,
    pub run_mode_details: String,
    pub run_mode_source: String,
    pub publish: bool,
    pub artifacts: String,
    pub meta: EnvMeta,
    pub missing_comparisons: Vec<String>,
    pub missing_comparison_ids: Vec<String>,
    pub how_to_read: Vec<String>,
    pub notes: Vec<String>,
    pub summary: Vec<SummaryItem>,
    pub baseline: Vec<BaselineSuite>,
    pub comparisons: Vec<ComparisonSuite>,
    pub pack_runner: Option<PackRunnerPayload>,
}

/// Summary-store slot: same header as [`RunPayload`], no per-vendor raw rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub generated_utc: String,
    pub schema_version: u32,
    pub os: String,
    pub framework: String,
    pub configuration: String,
    pub run_mode: String,
    pub run_mode_details: String,
    pub run_mode_source: String,
    pub publish: bool,
    pub artifacts: String,
    pub meta: EnvMeta,
    pub missing_comparisons: Vec<String>,
    pub missing_comparison_ids: Vec<String>,
    pub how_to_read: Vec<String>,
    pub notes: Vec<String>,
    pub summary: Vec<SummaryItem>,
    pub pack_runner: Option<PackRunnerPayload>,
}

impl RunPayload {
    /// Reduced projection written to the summary store.
    pub fn to_summary(&self) -> SummaryPayload {
        SummaryPayload {
            generated_utc: self.generated_utc.clone(),
            schema_version: self.schema_version,
            os: self.os.clone(),
            framework: self.framework.clone(),
            configuration: self.configuration.clone(),
            run_mode: self.run_mode.clone(),
            run_mode_details: self.run_mode_details.clone(),
            run_mode_source: self.run_mode_source.clone(),
            publish: self.publish,
            artifacts: self.artifacts.clone(),
            meta: self.meta.clone(),
            missing_comparisons: self.missing_comparisons.clone(),
            missing_comparison_ids: self.missing_comparison_ids.clone(),
            how_to_read: self.how_to_read.clone(),
            notes: self.notes.clone(),
            summary: self.summary.clone(),
            pack_runner: self.pack_runner.clone(),
        }
    }

    /// Lightweight entry appended to the run index.
    pub fn to_index_entry(&self) -> IndexEntry {
        IndexEntry {
            os: self.os.clone(),
            run_mode: self.run_mode.clone(),
            run_mode_source: self.run_mode_source.clone(),
            generated_utc: self.generated_utc.clone(),
            publish: self.publish,
            framework: self.framework.clone(),
            configuration: self.configuration.clone(),
            artifacts: self.artifacts.clone(),
            meta: self.meta.clone(),
        }
    }
}

/// Run-index entry: one per (os, runMode), replaced in place on rerun.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub os: String,
    pub run_mode: String,
    pub run_mode_source: String,
    pub generated_utc: String,
    pub publish: bool,
    pub framework: String,
    pub configuration: String,
    pub artifacts: String,
    pub meta: EnvMeta,
}

/// Per-pack engine summary from the decode-pack runner report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackEngineSummary {
    pub name: String,
    pub is_external: bool,
    pub runs: f64,
    pub decode_rate: f64,
    pub expected_rate: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub failing_scenarios: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackSummary {
    pub name: String,
    pub scenario_count: u64,
    pub engines: Vec<PackEngineSummary>,
}

/// Run-weighted aggregation of one engine across all packs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackEngineAggregate {
    pub name: String,
    pub is_external: bool,
    pub runs: f64,
    pub decode_rate: Option<f64>,
    pub expected_rate: Option<f64>,
    pub failing_scenarios: Vec<String>,
    pub failing_packs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRunnerPayload {
    pub report_path: String,
    pub generated_utc: Option<String>,
    pub mode: String,
    pub packs: Vec<PackSummary>,
    pub engines: Vec<PackEngineAggregate>,
    pub note: Option<String>,
}
