//! Cross-vendor comparison: grouping, fastest selection, ratios, rating.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::labels::parse_label;
use crate::records::MeasurementRow;
use crate::schema::{
    BaselineScenario, BaselineSuite, ComparisonScenario, ComparisonSuite, Rating, SummaryItem,
    VendorCell,
};
use crate::units::{parse_allocated_bytes, parse_duration_ns, repair_unit_glyphs};

/// Vendor cells for one scenario, in first-seen order. The order is the
/// tie-break for fastest selection: an exact nanosecond tie keeps the vendor
/// seen first.
type VendorRows = Vec<(String, VendorCell)>;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `1.2` renders as `"1.2 x"`; whole numbers keep one decimal (`"1.0 x"`).
fn ratio_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1} x")
    } else {
        format!("{value} x")
    }
}

/// Groups rows by canonical scenario, then by vendor. A vendor appearing
/// twice for one scenario keeps its position but takes the later value.
fn group_scenarios(catalog: &Catalog, rows: &[MeasurementRow]) -> BTreeMap<String, VendorRows> {
    let mut map: BTreeMap<String, VendorRows> = BTreeMap::new();
    for row in rows {
        if row.method.is_empty() {
            continue;
        }
        let label = parse_label(catalog, &row.method);
        let scenario = catalog.canonical_scenario(&label.scenario).to_string();
        let mean = repair_unit_glyphs(catalog, &row.mean);
        let cell = VendorCell {
            mean_ns: parse_duration_ns(&mean),
            mean,
            allocated: row.allocated.clone(),
        };
        let vendors = map.entry(scenario).or_default();
        match vendors.iter().position(|(v, _)| *v == label.vendor) {
            Some(pos) => vendors[pos].1 = cell,
            None => vendors.push((label.vendor, cell)),
        }
    }
    map
}

struct Fastest<'a> {
    vendor: &'a str,
    cell: &'a VendorCell,
    ns: f64,
}

/// Minimum parseable mean among the scenario's vendors; `None` when every
/// duration is unparseable.
fn pick_fastest(vendors: &VendorRows) -> Option<Fastest<'_>> {
    let mut best: Option<Fastest> = None;
    for (vendor, cell) in vendors {
        let Some(ns) = cell.mean_ns else { continue };
        match &best {
            Some(b) if ns >= b.ns => {}
            _ => best = Some(Fastest { vendor, cell, ns }),
        }
    }
    best
}

/// Rating thresholds are a fixed contract: good up to 1.10x time (and 1.25x
/// alloc when known), ok up to 1.50x time (and 2.00x alloc), inclusive.
pub fn rate_performance(time_ratio: Option<f64>, alloc_ratio: Option<f64>) -> Rating {
    let Some(time) = time_ratio else {
        return Rating::Unknown;
    };
    match alloc_ratio {
        Some(alloc) => {
            if time <= 1.1 && alloc <= 1.25 {
                Rating::Good
            } else if time <= 1.5 && alloc <= 2.0 {
                Rating::Ok
            } else {
                Rating::Bad
            }
        }
        None => {
            if time <= 1.1 {
                Rating::Good
            } else if time <= 1.5 {
                Rating::Ok
            } else {
                Rating::Bad
            }
        }
    }
}

/// Flattened summary rows for one compare suite: the subject vendor against
/// the fastest vendor per scenario, lexicographic scenario order. Scenarios
/// where no vendor parsed are dropped.
pub fn summary_items(catalog: &Catalog, title: &str, rows: &[MeasurementRow]) -> Vec<SummaryItem> {
    let grouped = group_scenarios(catalog, rows);
    let mut items = Vec::new();
    for (scenario, vendors) in &grouped {
        let Some(fastest) = pick_fastest(vendors) else {
            continue;
        };
        let subject = vendors.iter().find(|(v, _)| *v == catalog.subject_vendor);

        let mut time_ratio = None;
        let mut alloc_ratio = None;
        let mut subject_mean = String::new();
        let mut subject_alloc = String::new();
        if let Some((_, cell)) = subject {
            if let Some(subject_ns) = cell.mean_ns {
                time_ratio = Some(round2(subject_ns / fastest.ns));
                subject_mean = cell.mean.clone();
                subject_alloc = cell.allocated.clone();
                let fastest_bytes = parse_allocated_bytes(&fastest.cell.allocated);
                let subject_bytes = parse_allocated_bytes(&cell.allocated);
                if let (Some(fast), Some(subj)) = (fastest_bytes, subject_bytes) {
                    alloc_ratio = Some(round2(subj / fast));
                }
            }
        }

        items.push(SummaryItem {
            benchmark: title.to_string(),
            scenario: scenario.clone(),
            fastest_vendor: fastest.vendor.to_string(),
            fastest_mean: fastest.cell.mean.clone(),
            code_glyph_x_mean: subject_mean,
            code_glyph_x_alloc: subject_alloc,
            code_glyph_x_vs_fastest: time_ratio,
            code_glyph_x_vs_fastest_text: time_ratio.map(ratio_text).unwrap_or_default(),
            code_glyph_x_alloc_vs_fastest: alloc_ratio,
            code_glyph_x_alloc_vs_fastest_text: alloc_ratio.map(ratio_text).unwrap_or_default(),
            rating: rate_performance(time_ratio, alloc_ratio),
        });
    }
    items
}

/// Full per-vendor comparison payload for one suite. Each scenario carries
/// competitor-vs-subject ratios when the subject's own mean parsed.
pub fn comparison_suite(
    catalog: &Catalog,
    id: &str,
    title: &str,
    rows: &[MeasurementRow],
) -> ComparisonSuite {
    let grouped = group_scenarios(catalog, rows);
    let mut scenarios = Vec::new();
    for (name, vendors) in &grouped {
        let subject_ns = vendors
            .iter()
            .find(|(v, _)| *v == catalog.subject_vendor)
            .and_then(|(_, cell)| cell.mean_ns);
        let ratios = subject_ns.map(|subject_ns| {
            vendors
                .iter()
                .filter(|(v, _)| *v != catalog.subject_vendor)
                .filter_map(|(v, cell)| cell.mean_ns.map(|ns| (v.clone(), round3(ns / subject_ns))))
                .collect::<BTreeMap<String, f64>>()
        });
        scenarios.push(ComparisonScenario {
            name: name.clone(),
            vendors: vendors.iter().cloned().collect(),
            ratios,
        });
    }
    ComparisonSuite {
        id: id.to_string(),
        title: title.to_string(),
        scenarios,
    }
}

/// Baseline payload for a single-vendor suite: rows pass through in file
/// order, no ranking.
pub fn baseline_suite(
    catalog: &Catalog,
    id: &str,
    title: &str,
    rows: &[MeasurementRow],
) -> BaselineSuite {
    let scenarios = rows
        .iter()
        .map(|row| {
            let mean = repair_unit_glyphs(catalog, &row.mean);
            BaselineScenario {
                name: row.method.clone(),
                mean_ns: parse_duration_ns(&mean),
                mean,
                allocated: row.allocated.clone(),
            }
        })
        .collect();
    BaselineSuite {
        id: id.to_string(),
        title: title.to_string(),
        scenarios,
    }
}
