#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record types produced by PDF field extraction.
//!
//! Every extractor run yields a flat sequence of [`ExtractionRecord`]s,
//! one per matched reference/amount pair. The presentation and clipboard
//! crates only ever read these values; they are never mutated once built.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder stored in both token fields of a record that represents a
/// page without any match.
pub const NOT_FOUND: &str = "Não encontrado";

/// One reference/amount pair found on a single PDF page.
///
/// Both tokens come from the same pattern match, so they are either both
/// real values or both [`NOT_FOUND`]. The only way to build a record is
/// through [`ExtractionRecord::matched`] or [`ExtractionRecord::not_found`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRecord {
    /// File name (not the full path) of the originating document.
    #[serde(rename = "fileName")]
    source_file_name: String,
    /// 1-based page index inside the originating document.
    page_number: u32,
    /// Month/year reference token (`MM/YYYY`).
    #[serde(rename = "referencia")]
    reference: String,
    /// Amount token using `.` for thousands and `,` for decimals.
    #[serde(rename = "totalVencimentos")]
    total: String,
}

impl ExtractionRecord {
    /// Creates a record for a real pattern match.
    #[must_use]
    pub fn matched(
        source_file_name: impl Into<String>,
        page_number: u32,
        reference: impl Into<String>,
        total: impl Into<String>,
    ) -> Self {
        Self {
            source_file_name: source_file_name.into(),
            page_number,
            reference: reference.into(),
            total: total.into(),
        }
    }

    /// Creates a placeholder record for a page that had no match.
    #[must_use]
    pub fn not_found(source_file_name: impl Into<String>, page_number: u32) -> Self {
        Self {
            source_file_name: source_file_name.into(),
            page_number,
            reference: NOT_FOUND.to_owned(),
            total: NOT_FOUND.to_owned(),
        }
    }

    #[must_use]
    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub fn total(&self) -> &str {
        &self.total
    }

    /// Whether this record carries real tokens rather than the
    /// [`NOT_FOUND`] placeholder.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.total != NOT_FOUND
    }
}

/// What the extractor emits for a page whose text has no match at all.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EmptyPagePolicy {
    /// The page contributes no records.
    #[default]
    Skip,
    /// The page contributes one [`ExtractionRecord::not_found`] record.
    Sentinel,
}

/// How extracted records are written to the terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    /// Aligned table followed by the plain-text summary.
    #[default]
    Table,
    /// Pretty-printed JSON array of matched records.
    Json,
    /// Only the newline-joined summary.
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_sets_both_tokens() {
        let record = ExtractionRecord::not_found("a.pdf", 3);
        assert_eq!(record.reference(), NOT_FOUND);
        assert_eq!(record.total(), NOT_FOUND);
        assert_eq!(record.page_number(), 3);
        assert!(!record.is_match());
    }

    #[test]
    fn matched_record_is_match() {
        let record = ExtractionRecord::matched("a.pdf", 1, "05/2020", "1.234,56");
        assert!(record.is_match());
        assert_eq!(record.source_file_name(), "a.pdf");
    }

    #[test]
    fn serializes_with_legacy_field_names() {
        let record = ExtractionRecord::matched("a.pdf", 2, "06/2020", "2.000,00");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fileName"], "a.pdf");
        assert_eq!(json["pageNumber"], 2);
        assert_eq!(json["referencia"], "06/2020");
        assert_eq!(json["totalVencimentos"], "2.000,00");
    }

    #[test]
    fn policy_parses_from_kebab_case() {
        assert_eq!(
            "sentinel".parse::<EmptyPagePolicy>().unwrap(),
            EmptyPagePolicy::Sentinel
        );
        assert_eq!(EmptyPagePolicy::default().to_string(), "skip");
        assert!("bogus".parse::<OutputFormat>().is_err());
    }
}
