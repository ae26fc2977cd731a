//! Markdown report assembly and placeholder splicing.
//!
//! The report document is a fixed template with one placeholder-delimited
//! block per `(os, runMode)` pair. Each invocation regenerates only its own
//! block and carries every other block over verbatim.

use std::fs;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::{ReportError, Result};
use crate::schema::{BaselineSuite, ComparisonSuite, SummaryItem};
use crate::{OsName, RunMode};

/// Legend bullets shared by the Markdown report and the JSON payloads.
pub fn how_to_read_lines() -> Vec<String> {
    [
        "Mean: average time per operation. Lower is better.",
        "Allocated: managed memory allocated per operation. Lower is better.",
        "CodeGlyphX vs Fastest: CodeGlyphX mean divided by the fastest mean for that scenario. 1 x means CodeGlyphX is fastest; 1.5 x means ~50% slower.",
        "CodeGlyphX Alloc vs Fastest: CodeGlyphX allocated divided by the fastest allocation for that scenario. 1 x means CodeGlyphX allocates the least; higher is more allocations.",
        "Rating: good/ok/bad based on time + allocation ratios (good <=1.1x and <=1.25x alloc, ok <=1.5x and <=2.0x alloc).",
        "Quick runs use fewer iterations for fast feedback; Full runs use the harness default job settings and are recommended for publishing.",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Fixed methodology notes appended after the run-mode line.
pub fn methodology_notes() -> Vec<String> {
    [
        "Comparisons target PNG output and include encode+render (not encode-only).",
        "Module size and quiet zone are matched to CodeGlyphX defaults where possible; image size is derived from CodeGlyphX modules.",
        "ZXing.Net uses ZXing.Net.Bindings.ImageSharp.V3 (ImageSharp 3.x renderer).",
        "Barcoder uses Barcoder.Renderer.Image (ImageSharp renderer).",
        "QRCoder uses PngByteQRCode (managed PNG output, no external renderer).",
        "QR decode comparisons use raw RGBA32 bytes (ZXing via RGBLuminanceSource).",
        "QR decode clean uses CodeGlyphX Balanced; noisy uses CodeGlyphX Robust with aggressive sampling/limits; ZXing uses default (clean) and TryHarder (noisy).",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Everything one report block needs, already computed.
pub struct SectionInput<'a> {
    pub os: OsName,
    pub timestamp: String,
    pub framework: &'a str,
    pub configuration: &'a str,
    pub artifacts: &'a str,
    pub run_mode_details: &'a str,
    pub run_mode_warning: Option<&'a str>,
    pub missing_compare_titles: &'a [String],
    pub summary: &'a [SummaryItem],
    pub baseline: &'a [BaselineSuite],
    pub comparisons: &'a [ComparisonSuite],
}

/// Renders the block for one `(os, runMode)` pair.
pub fn build_section(catalog: &Catalog, input: &SectionInput<'_>) -> String {
    let subject = &catalog.subject_vendor;
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("## {}", input.os.as_str().to_uppercase()));
    lines.push(String::new());
    lines.push(format!("Updated: {}", input.timestamp));
    lines.push(format!("Framework: {}", input.framework));
    lines.push(format!("Configuration: {}", input.configuration));
    lines.push(format!("Artifacts: {}", input.artifacts));
    lines.push("How to read:".to_string());
    for line in how_to_read_lines() {
        lines.push(format!("- {line}"));
    }
    lines.push("Notes:".to_string());
    lines.push(format!("- {}", input.run_mode_details));
    for note in methodology_notes() {
        lines.push(format!("- {note}"));
    }

    let mut warnings: Vec<String> = Vec::new();
    if let Some(warning) = input.run_mode_warning {
        warnings.push(warning.to_string());
    }
    if !input.missing_compare_titles.is_empty() {
        warnings.push(format!(
            "Missing compare results: {}.",
            input.missing_compare_titles.join(", ")
        ));
    }
    if !warnings.is_empty() {
        lines.push("Warnings:".to_string());
        for warning in warnings {
            lines.push(format!("- {warning}"));
        }
    }
    lines.push(String::new());

    if !input.summary.is_empty() {
        lines.push("### Summary (Comparisons)".to_string());
        lines.push(String::new());
        lines.push(format!(
            "| Benchmark | Scenario | Fastest | {subject} vs Fastest | {subject} Alloc vs Fastest | Rating | {subject} Mean | {subject} Alloc |"
        ));
        lines.push("| --- | --- | --- | --- | --- | --- | --- | --- |".to_string());
        for item in input.summary {
            lines.push(format!(
                "| {} | {} | {} {} | {} | {} | {} | {} | {} |",
                item.benchmark,
                item.scenario,
                item.fastest_vendor,
                item.fastest_mean,
                item.code_glyph_x_vs_fastest_text,
                item.code_glyph_x_alloc_vs_fastest_text,
                item.rating,
                item.code_glyph_x_mean,
                item.code_glyph_x_alloc
            ));
        }
        lines.push(String::new());
    }

    if !input.baseline.is_empty() {
        lines.push("### Baseline".to_string());
        lines.push(String::new());
        for suite in input.baseline {
            lines.push(format!("#### {}", suite.title));
            lines.push(String::new());
            lines.push("| Scenario | Mean | Allocated |".to_string());
            lines.push("| --- | --- | --- |".to_string());
            for scenario in &suite.scenarios {
                lines.push(format!(
                    "| {} | {} | {} |",
                    scenario.name, scenario.mean, scenario.allocated
                ));
            }
            lines.push(String::new());
        }
    }

    if !input.comparisons.is_empty() {
        lines.push("### Comparisons".to_string());
        lines.push(String::new());
        for suite in input.comparisons {
            lines.push(format!("#### {}", suite.title));
            lines.push(String::new());
            let header: Vec<String> = catalog
                .vendors
                .iter()
                .map(|v| format!("{v} (Mean / Alloc)"))
                .collect();
            lines.push(format!("| Scenario | {} |", header.join(" | ")));
            lines.push(format!("|{}", " --- |".repeat(catalog.vendors.len() + 1)));
            for scenario in &suite.scenarios {
                let cells: Vec<String> = catalog
                    .vendors
                    .iter()
                    .map(|vendor| match scenario.vendors.get(vendor) {
                        Some(cell) => format!("{}<br>{}", cell.mean, cell.allocated),
                        None => String::new(),
                    })
                    .collect();
                lines.push(format!("| {} | {} |", scenario.name, cells.join(" | ")));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n").trim_end().to_string()
}

fn marker_start(os: OsName, run_mode: RunMode) -> String {
    format!(
        "<!-- BENCHMARK:{}:{}:START -->",
        os.as_str().to_uppercase(),
        run_mode.as_str().to_uppercase()
    )
}

fn marker_end(os: OsName, run_mode: RunMode) -> String {
    format!(
        "<!-- BENCHMARK:{}:{}:END -->",
        os.as_str().to_uppercase(),
        run_mode.as_str().to_uppercase()
    )
}

/// Existing block for a key, or a stub when the document has none yet.
pub fn extract_block(text: &str, os: OsName, run_mode: RunMode) -> String {
    let start = marker_start(os, run_mode);
    let end = marker_end(os, run_mode);
    if let Some(s) = text.find(&start) {
        if let Some(e) = text[s..].find(&end) {
            return text[s..s + e + end.len()].to_string();
        }
    }
    format!("{start}\n_no results yet_\n{end}")
}

fn template_header() -> Vec<String> {
    [
        "# Benchmarks",
        "",
        "**Data locations**",
        "- Generated files are overwritten on each run (do not edit by hand).",
        "- Human-readable report: `BENCHMARK.md`",
        "- Website JSON: `assets/data/benchmark.json`",
        "- Summary JSON: `assets/data/benchmark-summary.json`",
        "- Index JSON: `assets/data/benchmark-index.json`",
        "",
        "**Publish flag**",
        "- Quick runs default to `publish=false` (draft).",
        "- Full runs default to `publish=true`.",
        "- Override with `--publish` or `--no-publish` on the report generator.",
        "",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Replaces one key's block and rewrites the whole document, preserving the
/// other five blocks verbatim.
pub fn splice_section(path: &Path, section: &str, os: OsName, run_mode: RunMode) -> Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(raw) => raw
            .strip_prefix('\u{feff}')
            .map(str::to_string)
            .unwrap_or(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(ReportError::io(path, e)),
    };

    let mut parts = template_header();
    for o in OsName::ALL {
        for m in [RunMode::Quick, RunMode::Full] {
            let block = if o == os && m == run_mode {
                format!("{}\n{}\n{}", marker_start(o, m), section, marker_end(o, m))
            } else {
                extract_block(&text, o, m)
            };
            parts.push(block);
            parts.push(String::new());
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
        }
    }
    fs::write(path, parts.join("\n")).map_err(|e| ReportError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{baseline_suite, comparison_suite, summary_items};
    use crate::records::MeasurementRow;
    use tempfile::tempdir;

    fn row(method: &str, mean: &str, allocated: &str) -> MeasurementRow {
        MeasurementRow {
            method: method.to_string(),
            mean: mean.to_string(),
            allocated: allocated.to_string(),
        }
    }

    fn sample_section(catalog: &Catalog) -> String {
        let rows = vec![
            row("CodeGlyphX QR PNG", "120 ns", "48 B"),
            row("ZXing.Net QR PNG", "100 ns", "64 B"),
        ];
        let summary = summary_items(catalog, "QR (Encode)", &rows);
        let comparisons = vec![comparison_suite(catalog, "QrCompareBenchmarks", "QR (Encode)", &rows)];
        let baseline = vec![baseline_suite(
            catalog,
            "QrCodeBenchmarks",
            "QR (Encode)",
            &[row("QR PNG", "450 ns", "128 B")],
        )];
        build_section(
            catalog,
            &SectionInput {
                os: OsName::Linux,
                timestamp: "2026-02-01 10:00:00 UTC".to_string(),
                framework: "net8.0",
                configuration: "Release",
                artifacts: "/tmp/linux-x64",
                run_mode_details: "Run mode: Quick (warmupCount=1, iterationCount=3, invocationCount=1).",
                run_mode_warning: None,
                missing_compare_titles: &["Aztec (Encode)".to_string()],
                summary: &summary,
                baseline: &baseline,
                comparisons: &comparisons,
            },
        )
    }

    #[test]
    fn section_renders_all_tables() {
        let catalog = Catalog::default();
        let section = sample_section(&catalog);
        assert!(section.starts_with("## LINUX"));
        assert!(section.contains("### Summary (Comparisons)"));
        assert!(section.contains("| QR (Encode) | QR PNG | ZXing.Net 100 ns | 1.2 x | 0.75 x | ok | 120 ns | 48 B |"));
        assert!(section.contains("### Baseline"));
        assert!(section.contains("| QR PNG | 450 ns | 128 B |"));
        assert!(section.contains("### Comparisons"));
        assert!(section.contains("| QR PNG | 120 ns<br>48 B | 100 ns<br>64 B |  |  |"));
        assert!(section.contains("- Missing compare results: Aztec (Encode)."));
    }

    #[test]
    fn extract_block_stubs_missing_keys() {
        let block = extract_block("", OsName::Windows, RunMode::Full);
        assert_eq!(
            block,
            "<!-- BENCHMARK:WINDOWS:FULL:START -->\n_no results yet_\n<!-- BENCHMARK:WINDOWS:FULL:END -->"
        );
    }

    #[test]
    fn splice_preserves_other_blocks() {
        let catalog = Catalog::default();
        let dir = tempdir().unwrap();
        let path = dir.path().join("BENCHMARK.md");

        let section = sample_section(&catalog);
        splice_section(&path, &section, OsName::Linux, RunMode::Quick).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.contains("<!-- BENCHMARK:LINUX:QUICK:START -->\n## LINUX"));
        assert!(first.contains("<!-- BENCHMARK:WINDOWS:FULL:START -->\n_no results yet_"));

        splice_section(&path, "## WINDOWS\n\nnewer", OsName::Windows, RunMode::Full).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        // The linux block survives byte for byte.
        assert!(second.contains("<!-- BENCHMARK:LINUX:QUICK:START -->\n## LINUX"));
        assert!(second.contains("| QR (Encode) | QR PNG | ZXing.Net 100 ns |"));
        assert!(second.contains("<!-- BENCHMARK:WINDOWS:FULL:START -->\n## WINDOWS\n\nnewer\n<!-- BENCHMARK:WINDOWS:FULL:END -->"));
        assert!(!second.contains("<!-- BENCHMARK:WINDOWS:FULL:START -->\n_no results yet_"));
    }
}
