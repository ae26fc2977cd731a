//! Parsing of vendor-formatted duration and allocation strings.
//!
//! Both parsers are null-on-mismatch: a value that does not match the grammar
//! becomes `None`, which downstream logic treats as "incomparable", never as
//! a failure.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Catalog;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(ns|us|\u{3bc}s|ms|s)$").unwrap());

static ALLOC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(B|KB|MB)$").unwrap());

/// Repairs known encoding corruptions of the microsecond glyph.
///
/// Must run on every mean text before it is displayed or parsed; a corrupted
/// glyph otherwise fails the duration grammar.
pub fn repair_unit_glyphs(catalog: &Catalog, text: &str) -> String {
    let mut out = text.to_string();
    for (bad, good) in &catalog.glyph_repairs {
        if out.contains(bad.as_str()) {
            out = out.replace(bad.as_str(), good);
        }
    }
    out
}

/// Converts a human-formatted duration to nanoseconds.
///
/// Thousands separators are stripped; the literal `NA` and anything outside
/// the `<number><optional space><unit>` grammar parse to `None`.
pub fn parse_duration_ns(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "NA" {
        return None;
    }
    let caps = DURATION_RE.captures(&cleaned)?;
    let number: f64 = caps[1].parse().ok()?;
    let scale = match &caps[2] {
        "ns" => 1.0,
        "us" | "\u{3bc}s" => 1_000.0,
        "ms" => 1_000_000.0,
        _ => 1_000_000_000.0,
    };
    Some(number * scale)
}

/// Converts `"<number> <B|KB|MB>"` to a byte count (binary multiples).
pub fn parse_allocated_bytes(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "NA" {
        return None;
    }
    let caps = ALLOC_RE.captures(&cleaned)?;
    let number: f64 = caps[1].parse().ok()?;
    let scale = match &caps[2] {
        "B" => 1.0,
        "KB" => 1024.0,
        _ => 1024.0 * 1024.0,
    };
    Some(number * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_units_scale_linearly() {
        for unit in ["ns", "us", "\u{3bc}s", "ms", "s"] {
            let one = parse_duration_ns(&format!("1{unit}")).unwrap();
            let two = parse_duration_ns(&format!("2{unit}")).unwrap();
            assert_eq!(two, 2.0 * one, "unit {unit}");
        }
    }

    #[test]
    fn duration_examples() {
        assert_eq!(parse_duration_ns("1.5 \u{3bc}s"), Some(1500.0));
        assert_eq!(parse_duration_ns("1,500 ns"), Some(1500.0));
        assert_eq!(parse_duration_ns("450 ns"), Some(450.0));
        assert_eq!(parse_duration_ns("2 s"), Some(2_000_000_000.0));
    }

    #[test]
    fn duration_rejects_na_and_garbage() {
        assert_eq!(parse_duration_ns("NA"), None);
        assert_eq!(parse_duration_ns("garbage"), None);
        assert_eq!(parse_duration_ns(""), None);
        assert_eq!(parse_duration_ns("12 parsecs"), None);
        assert_eq!(parse_duration_ns("ns"), None);
    }

    #[test]
    fn allocation_uses_binary_multiples() {
        assert_eq!(parse_allocated_bytes("48 B"), Some(48.0));
        assert_eq!(parse_allocated_bytes("1 KB"), Some(1024.0));
        assert_eq!(parse_allocated_bytes("1.5 MB"), Some(1.5 * 1024.0 * 1024.0));
        assert_eq!(parse_allocated_bytes("NA"), None);
        assert_eq!(parse_allocated_bytes("48 GB"), None);
    }

    #[test]
    fn glyph_repairs_fix_corrupted_micro_signs() {
        let catalog = Catalog::default();
        for broken in ["1.23 \u{b5}s", "1.23 \u{fffd}s", "1.23 \u{c2}\u{b5}s", "1.23 \u{c2}\u{3bc}s"] {
            let fixed = repair_unit_glyphs(&catalog, broken);
            assert_eq!(fixed, "1.23 \u{3bc}s", "input {broken:?}");
            assert_eq!(parse_duration_ns(&fixed), Some(1230.0));
        }
        // Already-canonical text passes through untouched.
        assert_eq!(repair_unit_glyphs(&catalog, "100 ns"), "100 ns");
    }
}
