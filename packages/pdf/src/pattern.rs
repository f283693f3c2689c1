//! Reference/amount pattern matching over a single page of text.
//!
//! The pattern is fixed: a `MM/YYYY` reference, at least one whitespace
//! character, then an amount with `.` thousands separators and a `,`
//! followed by two decimal digits. Every non-overlapping match on the page
//! becomes one record.

use std::sync::LazyLock;

use cnis_extract_models::{EmptyPagePolicy, ExtractionRecord};
use regex::Regex;

/// Reference token in group 1, amount token in group 2.
static REFERENCE_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}/\d{4})\s+([\d.]+,\d{2})").expect("valid regex")
});

/// Joins a page's text fragments into the string the pattern is applied to.
///
/// Fragments are separated by exactly one space, so a reference and an
/// amount split across fragments still match.
#[must_use]
pub fn page_search_text<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts all reference/amount pairs from one page's search text.
///
/// Records come back in left-to-right match order. When the page has no
/// match, `policy` decides between no records and one
/// [`ExtractionRecord::not_found`] placeholder.
#[must_use]
pub fn extract_page(
    text: &str,
    file_name: &str,
    page_number: u32,
    policy: EmptyPagePolicy,
) -> Vec<ExtractionRecord> {
    let mut records: Vec<ExtractionRecord> = REFERENCE_AMOUNT_RE
        .captures_iter(text)
        .map(|caps| {
            let (_, [reference, total]) = caps.extract();
            ExtractionRecord::matched(file_name, page_number, reference, total)
        })
        .collect();

    if records.is_empty() && policy == EmptyPagePolicy::Sentinel {
        records.push(ExtractionRecord::not_found(file_name, page_number));
    }

    log::trace!(
        "{file_name} page {page_number}: {} record(s) from {} chars",
        records.len(),
        text.len()
    );

    records
}
