//! Closed lookup tables driving label normalization and report titles.
//!
//! Everything here is hand-maintained data: adding a vendor, reconciling a
//! scenario label variant, or titling a new suite is an edit to these tables,
//! not a code change. The tables travel as one immutable [`Catalog`] value so
//! callers can swap them out wholesale (tests do).

use std::collections::BTreeMap;

/// Sentinel vendor for labels that do not match `"<Vendor> <Scenario>"`.
pub const UNKNOWN_VENDOR: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct Catalog {
    /// Vendor under evaluation; ratios and ratings are computed for this one.
    pub subject_vendor: String,
    /// Known vendors, in the column order used by comparison tables.
    pub vendors: Vec<String>,
    /// Suite id -> display title. Unknown ids fall back to the raw id.
    pub titles: BTreeMap<String, String>,
    /// Scenario label variants collapsed to one comparable name.
    pub scenario_synonyms: BTreeMap<String, String>,
    /// Known encoding corruptions of the microsecond glyph, applied in order.
    pub glyph_repairs: Vec<(String, String)>,
    /// Namespace prefix stripped from report file stems.
    pub bench_prefix: String,
    /// Suffix stripped from report file stems.
    pub report_suffix: String,
}

impl Default for Catalog {
    fn default() -> Self {
        let titles = [
            ("QrCodeBenchmarks", "QR (Encode)"),
            ("QrDecodeBenchmarks", "QR (Decode)"),
            ("BarcodeBenchmarks", "1D Barcodes (Encode)"),
            ("MatrixCodeBenchmarks", "2D Matrix Codes (Encode)"),
            ("QrCompareBenchmarks", "QR (Encode)"),
            ("QrDecodeCleanCompareBenchmarks", "QR Decode (Clean)"),
            ("QrDecodeNoisyCompareBenchmarks", "QR Decode (Noisy)"),
            ("QrDecodeStressCompareBenchmarks", "QR Decode (Stress)"),
            ("Code128CompareBenchmarks", "Code 128 (Encode)"),
            ("Code39CompareBenchmarks", "Code 39 (Encode)"),
            ("Code93CompareBenchmarks", "Code 93 (Encode)"),
            ("EanCompareBenchmarks", "EAN-13 (Encode)"),
            ("UpcACompareBenchmarks", "UPC-A (Encode)"),
            ("DataMatrixCompareBenchmarks", "Data Matrix (Encode)"),
            ("Pdf417CompareBenchmarks", "PDF417 (Encode)"),
            ("AztecCompareBenchmarks", "Aztec (Encode)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let scenario_synonyms = [
            ("EAN PNG", "EAN-13 PNG"),
            ("QR Decode (clean, balanced)", "QR Decode (clean)"),
            ("QR Decode (noisy, robust)", "QR Decode (noisy)"),
            ("QR Decode (noisy, try harder)", "QR Decode (noisy)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        // Repair order matters: "\u{c2}\u{b5}s" first becomes "\u{c2}\u{3bc}s"
        // via the plain micro-sign rule, then the last rule finishes the job.
        let glyph_repairs = ["\u{b5}s", "\u{fffd}s", "\u{c2}\u{b5}s", "\u{c2}\u{3bc}s"]
            .into_iter()
            .map(|bad| (bad.to_string(), "\u{3bc}s".to_string()))
            .collect();

        Catalog {
            subject_vendor: "CodeGlyphX".to_string(),
            vendors: ["CodeGlyphX", "ZXing.Net", "QRCoder", "Barcoder"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            titles,
            scenario_synonyms,
            glyph_repairs,
            bench_prefix: "CodeGlyphX.Benchmarks.".to_string(),
            report_suffix: "-report".to_string(),
        }
    }
}

impl Catalog {
    pub fn is_vendor(&self, name: &str) -> bool {
        self.vendors.iter().any(|v| v == name)
    }

    /// Display title for a suite id, falling back to the id itself.
    pub fn title_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.titles.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Canonical scenario name after synonym collapsing.
    pub fn canonical_scenario<'a>(&'a self, name: &'a str) -> &'a str {
        self.scenario_synonyms
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Suite id from a report file stem, with the benchmark namespace prefix
    /// and the `-report` suffix removed.
    pub fn suite_id(&self, stem: &str) -> String {
        stem.replace(&self.bench_prefix, "")
            .replace(&self.report_suffix, "")
    }

    /// Compare-suite ids the dashboard expects, sorted.
    pub fn expected_compare_ids(&self) -> Vec<&str> {
        // BTreeMap keys are already sorted.
        self.titles
            .keys()
            .filter(|k| k.ends_with("CompareBenchmarks"))
            .map(String::as_str)
            .collect()
    }

    /// Expected-but-absent compare suites, as (titles, ids).
    pub fn missing_compare(&self, actual_ids: &[String]) -> (Vec<String>, Vec<String>) {
        let mut titles = Vec::new();
        let mut ids = Vec::new();
        for id in self.expected_compare_ids() {
            if actual_ids.iter().any(|a| a == id) {
                continue;
            }
            titles.push(self.title_for(id).to_string());
            ids.push(id.to_string());
        }
        (titles, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_falls_back_to_raw_id() {
        let catalog = Catalog::default();
        assert_eq!(catalog.title_for("QrCompareBenchmarks"), "QR (Encode)");
        assert_eq!(catalog.title_for("SomethingNew"), "SomethingNew");
    }

    #[test]
    fn suite_id_strips_prefix_and_suffix() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.suite_id("CodeGlyphX.Benchmarks.QrCompareBenchmarks-report"),
            "QrCompareBenchmarks"
        );
        assert_eq!(catalog.suite_id("QrCodeBenchmarks-report"), "QrCodeBenchmarks");
    }

    #[test]
    fn scenario_synonyms_collapse() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.canonical_scenario("QR Decode (noisy, try harder)"),
            "QR Decode (noisy)"
        );
        assert_eq!(catalog.canonical_scenario("EAN PNG"), "EAN-13 PNG");
        assert_eq!(catalog.canonical_scenario("QR PNG"), "QR PNG");
    }

    #[test]
    fn expected_compare_ids_are_sorted() {
        let catalog = Catalog::default();
        let ids = catalog.expected_compare_ids();
        assert_eq!(ids.len(), 12);
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn missing_compare_reports_absent_suites() {
        let catalog = Catalog::default();
        let actual: Vec<String> = catalog
            .expected_compare_ids()
            .iter()
            .filter(|id| **id != "AztecCompareBenchmarks")
            .map(|id| id.to_string())
            .collect();
        let (titles, ids) = catalog.missing_compare(&actual);
        assert_eq!(ids, vec!["AztecCompareBenchmarks".to_string()]);
        assert_eq!(titles, vec!["Aztec (Encode)".to_string()]);
    }
}
