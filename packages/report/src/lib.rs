#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal presentation of extracted records.
//!
//! Every view here only shows matched records: placeholders carrying
//! [`cnis_extract_models::NOT_FOUND`] are filtered out first. The summary
//! text is what gets copied to the clipboard.

use std::fmt::Write as _;

use cnis_extract_models::{ExtractionRecord, OutputFormat};

/// Errors that can occur while rendering records.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing into the output buffer failed.
    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

const HEADERS: [&str; 4] = ["File", "Page", "Reference", "Total"];

/// Returns the records that carry real tokens, in their original order.
#[must_use]
pub fn matched(records: &[ExtractionRecord]) -> Vec<&ExtractionRecord> {
    records.iter().filter(|r| r.is_match()).collect()
}

/// Formats one summary line: reference, a space, then the amount.
#[must_use]
pub fn summary_line(record: &ExtractionRecord) -> String {
    format!("{} {}", record.reference(), record.total())
}

/// Builds the plain-text summary: one line per matched record, joined by
/// `\n`, without a trailing newline.
#[must_use]
pub fn summary_text(records: &[ExtractionRecord]) -> String {
    matched(records)
        .into_iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_padded(out: &mut String, cell: &str, width: usize) {
    out.push_str(cell);
    let pad = width.saturating_sub(console::measure_text_width(cell));
    out.extend(std::iter::repeat_n(' ', pad));
}

fn push_row(out: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        push_padded(&mut line, cell, *width);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders matched records as an aligned table with the columns
/// File, Page, Reference and Total.
///
/// # Errors
///
/// Returns [`ReportError::Fmt`] if writing into the buffer fails.
pub fn render_table(records: &[ExtractionRecord]) -> Result<String, ReportError> {
    let rows = matched(records);
    let pages: Vec<String> = rows.iter().map(|r| r.page_number().to_string()).collect();

    let mut widths = HEADERS.map(console::measure_text_width);
    for (record, page) in rows.iter().zip(&pages) {
        let cells = [
            record.source_file_name(),
            page.as_str(),
            record.reference(),
            record.total(),
        ];
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(console::measure_text_width(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS, &widths);
    let rule_width = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    writeln!(out, "{}", "-".repeat(rule_width))?;

    if rows.is_empty() {
        out.push_str("(no matches)\n");
    }

    for (record, page) in rows.iter().zip(&pages) {
        push_row(
            &mut out,
            &[
                record.source_file_name(),
                page.as_str(),
                record.reference(),
                record.total(),
            ],
            &widths,
        );
    }

    Ok(out)
}

/// Renders matched records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ReportError::Json`] if serialization fails.
pub fn render_json(records: &[ExtractionRecord]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&matched(records))?)
}

/// Renders records in the requested format.
///
/// [`OutputFormat::Table`] prints the table followed by the summary block.
///
/// # Errors
///
/// Returns [`ReportError`] if rendering fails.
pub fn render(records: &[ExtractionRecord], format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Table => {
            let mut out = render_table(records)?;
            writeln!(out)?;
            writeln!(out, "Extracted values:")?;
            let summary = summary_text(records);
            if !summary.is_empty() {
                writeln!(out, "{summary}")?;
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(records),
        OutputFormat::Summary => Ok(summary_text(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ExtractionRecord> {
        vec![
            ExtractionRecord::matched("a.pdf", 1, "05/2020", "1.234,56"),
            ExtractionRecord::not_found("a.pdf", 2),
            ExtractionRecord::matched("a.pdf", 3, "06/2020", "2.000,00"),
            ExtractionRecord::matched("extrato-ção.pdf", 12, "07/2020", "10,00"),
        ]
    }

    #[test]
    fn summary_has_one_line_per_matched_record() {
        let records = sample();
        let summary = summary_text(&records);
        let lines: Vec<&str> = summary.split('\n').collect();

        let kept = matched(&records);
        assert_eq!(lines.len(), kept.len());
        for (line, record) in lines.iter().zip(kept) {
            assert_eq!(*line, format!("{} {}", record.reference(), record.total()));
        }
        assert_eq!(lines, vec!["05/2020 1.234,56", "06/2020 2.000,00", "07/2020 10,00"]);
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        assert_eq!(summary_text(&[]), "");
        assert_eq!(summary_text(&[ExtractionRecord::not_found("a.pdf", 1)]), "");
    }

    #[test]
    fn table_skips_placeholders_and_aligns_columns() {
        let table = render_table(&sample()).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("File"));
        assert!(lines[0].ends_with("Total"));
        assert!(!table.contains(cnis_extract_models::NOT_FOUND));

        let reference_col = lines[0].find("Reference").unwrap();
        assert_eq!(lines[2].find("05/2020"), Some(reference_col));
        assert_eq!(lines[3].find("06/2020"), Some(reference_col));
        // Column positions are in display cells, not bytes.
        let row = lines[4];
        let prefix_end = row.find("07/2020").unwrap();
        assert_eq!(console::measure_text_width(&row[..prefix_end]), reference_col);
    }

    #[test]
    fn empty_table_says_so() {
        let table = render_table(&[]).unwrap();
        assert!(table.contains("(no matches)"));
    }

    #[test]
    fn json_keeps_legacy_field_names() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["referencia"], "05/2020");
        assert_eq!(array[0]["totalVencimentos"], "1.234,56");
    }

    #[test]
    fn summary_format_is_summary_text() {
        let records = sample();
        assert_eq!(
            render(&records, OutputFormat::Summary).unwrap(),
            summary_text(&records)
        );
        assert!(
            render(&records, OutputFormat::Table)
                .unwrap()
                .ends_with("07/2020 10,00\n")
        );
    }
}
