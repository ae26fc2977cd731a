//! End-to-end runs of the report generator over a synthetic artifacts tree.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn report_cmd() -> Command {
    Command::cargo_bin("codeglyphx-bench-report").expect("binary builds")
}

/// Artifacts directory with one compare suite, one baseline suite, and a
/// quick-mode harness report for run-mode inference.
fn build_artifacts(root: &Path) {
    let results = root.join("linux-x64").join("results");
    fs::create_dir_all(&results).unwrap();
    fs::write(
        results.join("CodeGlyphX.Benchmarks.QrCompareBenchmarks-report.csv"),
        "Method,Mean,Allocated\n\
         'CodeGlyphX QR PNG',120 ns,48 B\n\
         'ZXing.Net QR PNG',100 ns,64 B\n\
         'QRCoder QR PNG',NA,NA\n",
    )
    .unwrap();
    fs::write(
        results.join("CodeGlyphX.Benchmarks.QrCodeBenchmarks-report.csv"),
        "Method;Mean;Allocated\nQR PNG (V5);450 ns;128 B\n",
    )
    .unwrap();
    fs::write(
        results.join("CodeGlyphX.Benchmarks.QrCompareBenchmarks-report-github.md"),
        "Job: IterationCount=3 WarmupCount=1 InvocationCount=1\n",
    )
    .unwrap();
}

fn artifacts_path(root: &Path) -> std::path::PathBuf {
    root.join("linux-x64")
}

#[test]
fn writes_markdown_and_all_three_stores() {
    let tmp = TempDir::new().unwrap();
    build_artifacts(tmp.path());
    let output = tmp.path().join("BENCHMARK.md");
    let data_dir = tmp.path().join("assets").join("data");

    report_cmd()
        .arg("--artifacts-path")
        .arg(artifacts_path(tmp.path()))
        .arg("--output")
        .arg(&output)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--allow-partial")
        .assert()
        .success();

    let markdown = fs::read_to_string(&output).unwrap();
    assert!(markdown.contains("<!-- BENCHMARK:LINUX:QUICK:START -->"));
    assert!(markdown.contains("## LINUX"));
    assert!(markdown.contains("| QR (Encode) | QR PNG | ZXing.Net 100 ns | 1.2 x | 0.75 x | ok |"));
    assert!(markdown.contains("| QR PNG (V5) | 450 ns | 128 B |"));
    // The other five slots exist as stubs.
    assert!(markdown.contains("<!-- BENCHMARK:MACOS:FULL:START -->\n_no results yet_"));

    let detailed: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark.json")).unwrap())
            .unwrap();
    let slot = &detailed["linux"]["quick"];
    assert_eq!(slot["os"], "linux");
    assert_eq!(slot["runMode"], "quick");
    assert_eq!(slot["runModeSource"], "inferred");
    assert_eq!(slot["publish"], false);
    assert_eq!(slot["schemaVersion"], 1);
    assert_eq!(slot["summary"][0]["fastestVendor"], "ZXing.Net");
    assert_eq!(slot["summary"][0]["codeGlyphXVsFastest"], 1.2);
    assert_eq!(slot["summary"][0]["rating"], "ok");
    assert_eq!(slot["baseline"][0]["id"], "QrCodeBenchmarks");
    assert_eq!(
        slot["comparisons"][0]["scenarios"][0]["vendors"]["QRCoder"]["meanNs"],
        Value::Null
    );
    // Untouched dimensions stay at their skeleton value.
    assert_eq!(detailed["windows"]["full"], Value::Null);

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark-summary.json")).unwrap())
            .unwrap();
    assert!(summary["linux"]["quick"].get("comparisons").is_none());
    assert_eq!(summary["linux"]["quick"]["summary"][0]["rating"], "ok");

    let index: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark-index.json")).unwrap())
            .unwrap();
    assert_eq!(index["schemaVersion"], 1);
    let entries = index["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["os"], "linux");
    assert_eq!(entries[0]["runMode"], "quick");
}

#[test]
fn rerun_replaces_only_its_own_slot() {
    let tmp = TempDir::new().unwrap();
    build_artifacts(tmp.path());
    let output = tmp.path().join("BENCHMARK.md");
    let data_dir = tmp.path().join("data");

    let invoke = |os: &str| {
        report_cmd()
            .arg("--artifacts-path")
            .arg(artifacts_path(tmp.path()))
            .arg("--output")
            .arg(&output)
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("--os-name")
            .arg(os)
            .arg("--allow-partial")
            .assert()
            .success();
    };
    invoke("windows");
    let windows_slot = {
        let doc: Value =
            serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark.json")).unwrap())
                .unwrap();
        doc["windows"]["quick"].clone()
    };
    invoke("linux");

    let doc: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark.json")).unwrap())
            .unwrap();
    assert!(doc["linux"]["quick"].is_object());
    // Everything except the volatile timestamp survives the second run.
    assert_eq!(
        doc["windows"]["quick"]["summary"],
        windows_slot["summary"]
    );
    assert_eq!(doc["windows"]["quick"]["os"], "windows");

    let index: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark-index.json")).unwrap())
            .unwrap();
    assert_eq!(index["entries"].as_array().unwrap().len(), 2);

    // Rerunning an existing key dedupes its index entry.
    invoke("windows");
    let index: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark-index.json")).unwrap())
            .unwrap();
    let entries = index["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["os"], "windows");
}

#[test]
fn strict_mode_fails_on_missing_compare_suites() {
    let tmp = TempDir::new().unwrap();
    build_artifacts(tmp.path());

    report_cmd()
        .arg("--artifacts-path")
        .arg(artifacts_path(tmp.path()))
        .arg("--output")
        .arg(tmp.path().join("BENCHMARK.md"))
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing compare results"))
        .stderr(predicate::str::contains("Aztec (Encode)"));

    // Artifacts are still written before the strict check fires.
    assert!(tmp.path().join("data").join("benchmark.json").is_file());
}

#[test]
fn missing_results_folder_is_fatal() {
    let tmp = TempDir::new().unwrap();
    report_cmd()
        .arg("--artifacts-path")
        .arg(tmp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("results folder not found"));
}

#[test]
fn publish_flag_can_be_forced_for_quick_runs() {
    let tmp = TempDir::new().unwrap();
    build_artifacts(tmp.path());
    let data_dir = tmp.path().join("data");

    report_cmd()
        .arg("--artifacts-path")
        .arg(artifacts_path(tmp.path()))
        .arg("--output")
        .arg(tmp.path().join("BENCHMARK.md"))
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--allow-partial")
        .arg("--publish")
        .assert()
        .success();

    let index: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("benchmark-index.json")).unwrap())
            .unwrap();
    assert_eq!(index["entries"][0]["publish"], true);
}
