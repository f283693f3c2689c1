#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reference/amount extraction from PDF documents.
//!
//! Each page's text layer is pulled out with [`pdf_extract`], its
//! fragments are joined into one search string, and a fixed pattern
//! ([`pattern`]) turns every `MM/YYYY 1.234,56` pair into an
//! [`ExtractionRecord`].
//!
//! Decoding sits behind the [`TextSource`] trait so the page scan can be
//! driven without real PDF files. [`batch`] runs whole upload batches and
//! keeps per-file failures separate from the records already collected.

pub mod batch;
pub mod pattern;
pub mod progress;

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use cnis_extract_models::{EmptyPagePolicy, ExtractionRecord};

pub use batch::{
    BatchOptions, BatchOutcome, FileFailure, collect_pdf_paths, extract_batch, extract_file,
};
pub use pattern::{extract_page, page_search_text};

/// A document could not be turned into page text.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The file could not be read into memory.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The bytes are not a parseable PDF (corrupt, encrypted, or not a
    /// PDF at all).
    #[error("failed to decode {file}: {source}")]
    Decode {
        /// File name of the document.
        file: String,
        /// What the decoder reported.
        source: DecodeError,
    },

    /// The blocking decode task was cancelled or panicked.
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// An I/O operation failed while listing input paths.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered pages, each an ordered list of text fragments.
pub type PageFragments = Vec<Vec<String>>;

/// Turns raw document bytes into per-page text fragments.
pub trait TextSource: Send + Sync {
    /// Decodes `bytes` into pages of text fragments, first page first.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the bytes cannot be decoded.
    fn pages(&self, bytes: &[u8]) -> Result<PageFragments, DecodeError>;
}

/// [`TextSource`] backed by the pure-Rust `pdf-extract` crate.
///
/// Every non-blank line of a page's text layer is treated as one
/// fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractSource;

impl TextSource for PdfExtractSource {
    fn pages(&self, bytes: &[u8]) -> Result<PageFragments, DecodeError> {
        // pdf-extract panics on some malformed inputs instead of erroring.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        let pages = match result {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(DecodeError(e.to_string())),
            Err(_) => {
                return Err(DecodeError(
                    "PDF extraction panicked (malformed document)".to_owned(),
                ));
            }
        };

        Ok(pages
            .iter()
            .map(|page| {
                page.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .collect())
    }
}

/// Extracts every record from one document, in page order.
///
/// Page numbers start at 1. A decode failure aborts the whole document;
/// there is no partial result.
///
/// # Errors
///
/// Returns [`PdfError::Decode`] if `source` cannot decode `bytes`.
pub fn extract_document(
    bytes: &[u8],
    file_name: &str,
    source: &dyn TextSource,
    policy: EmptyPagePolicy,
) -> Result<Vec<ExtractionRecord>, PdfError> {
    let pages = source.pages(bytes).map_err(|e| PdfError::Decode {
        file: file_name.to_owned(),
        source: e,
    })?;

    log::debug!("Decoded {} page(s) from {file_name}", pages.len());

    let mut records = Vec::new();

    for (page_number, fragments) in (1_u32..).zip(&pages) {
        let text = page_search_text(fragments.as_slice());
        records.extend(extract_page(&text, file_name, page_number, policy));
    }

    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Serves fixed pages, or fails when the bytes start with `BAD`.
    pub struct FakeSource(pub Vec<Vec<&'static str>>);

    impl TextSource for FakeSource {
        fn pages(&self, bytes: &[u8]) -> Result<PageFragments, DecodeError> {
            if bytes.starts_with(b"BAD") {
                return Err(DecodeError("not a PDF".to_owned()));
            }
            Ok(self
                .0
                .iter()
                .map(|page| page.iter().map(|s| (*s).to_owned()).collect())
                .collect())
        }
    }

    #[test]
    fn numbers_pages_from_one_in_order() {
        let source = FakeSource(vec![
            vec!["Competência", "01/2020", "1.000,00"],
            vec!["sem dados"],
            vec!["02/2020 2.000,00", "03/2020", "3.000,00"],
        ]);

        let records =
            extract_document(b"%PDF", "a.pdf", &source, EmptyPagePolicy::Skip).unwrap();

        let summary: Vec<(u32, &str)> = records
            .iter()
            .map(|r| (r.page_number(), r.reference()))
            .collect();
        assert_eq!(summary, vec![(1, "01/2020"), (3, "02/2020"), (3, "03/2020")]);
    }

    #[test]
    fn sentinel_policy_marks_empty_pages() {
        let source = FakeSource(vec![vec!["01/2020 1.000,00"], vec!["nada"]]);

        let records =
            extract_document(b"%PDF", "a.pdf", &source, EmptyPagePolicy::Sentinel).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_match());
        assert_eq!(records[1], ExtractionRecord::not_found("a.pdf", 2));
    }

    #[test]
    fn decode_failure_names_the_file() {
        let source = FakeSource(vec![]);

        let err = extract_document(b"BAD", "broken.pdf", &source, EmptyPagePolicy::Skip)
            .unwrap_err();

        assert!(matches!(err, PdfError::Decode { ref file, .. } if file == "broken.pdf"));
        assert!(err.to_string().contains("not a PDF"));
    }

    /// Builds a minimal PDF with one Helvetica text line per entry.
    fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        use std::fmt::Write as _;

        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_owned(),
        ];

        for (i, lines) in pages.iter().enumerate() {
            let mut content = String::from("BT /F1 12 Tf 72 720 Td");
            for (n, line) in lines.iter().enumerate() {
                if n > 0 {
                    content.push_str(" 0 -20 Td");
                }
                write!(content, " ({line}) Tj").unwrap();
            }
            content.push_str(" ET");

            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            write!(pdf, "{} 0 obj\n{body}\nendobj\n", i + 1).unwrap();
        }

        let xref = pdf.len();
        write!(pdf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).unwrap();
        for offset in offsets {
            write!(pdf, "{offset:010} 00000 n \n").unwrap();
        }
        write!(
            pdf,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .unwrap();

        pdf.into_bytes()
    }

    #[test]
    fn pdf_extract_source_reads_real_pages_in_order() {
        let bytes = build_pdf(&[
            &["05/2020 1.234,56", "06/2020 2.000,00"],
            &["nada"],
            &["07/2020 999,10"],
        ]);

        let pages = PdfExtractSource.pages(&bytes).unwrap();
        assert_eq!(pages.len(), 3);

        let records =
            extract_document(&bytes, "cnis.pdf", &PdfExtractSource, EmptyPagePolicy::Skip)
                .unwrap();

        let seen: Vec<(u32, &str, &str)> = records
            .iter()
            .map(|r| (r.page_number(), r.reference(), r.total()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (1, "05/2020", "1.234,56"),
                (1, "06/2020", "2.000,00"),
                (3, "07/2020", "999,10"),
            ]
        );
        assert!(records.iter().all(|r| r.source_file_name() == "cnis.pdf"));
    }

    #[test]
    fn pdf_extract_source_rejects_garbage() {
        let result = PdfExtractSource.pages(b"definitely not a pdf");
        assert!(result.is_err());
    }
}
