//! Splitting raw method labels into (vendor, scenario).

use crate::catalog::{Catalog, UNKNOWN_VENDOR};

/// A normalized method label. Normalization is pure and total: every raw
/// label produces exactly one `ParsedLabel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    pub vendor: String,
    pub scenario: String,
}

/// Splits a raw label on the first whitespace run. The head token must
/// exactly match a known vendor; otherwise the whole text is kept as the
/// scenario under the `Unknown` vendor.
pub fn parse_label(catalog: &Catalog, raw: &str) -> ParsedLabel {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParsedLabel {
            vendor: UNKNOWN_VENDOR.to_string(),
            scenario: String::new(),
        };
    }
    if let Some((head, rest)) = trimmed.split_once(char::is_whitespace) {
        let rest = rest.trim_start();
        if !rest.is_empty() && catalog.is_vendor(head) {
            return ParsedLabel {
                vendor: head.to_string(),
                scenario: rest.to_string(),
            };
        }
    }
    ParsedLabel {
        vendor: UNKNOWN_VENDOR.to_string(),
        scenario: trimmed.to_string(),
    }
}
