//! Extraction flow shared by the `extract` command and the interactive
//! extractor view.

use std::path::PathBuf;
use std::sync::Arc;

use cnis_extract_cli_utils::{ExtractionBar, MultiProgress};
use cnis_extract_clipboard::{ClipboardConfig, copy_summary};
use cnis_extract_models::{ExtractionRecord, OutputFormat};
use cnis_extract_pdf::progress::ProgressCallback;
use cnis_extract_pdf::{
    BatchOptions, BatchOutcome, PdfExtractSource, collect_pdf_paths, extract_batch,
};
use cnis_extract_report::{matched, render, summary_text};

use crate::notify::{Level, Notify};

/// Expands `inputs` and extracts every PDF found, reporting each failed
/// file as a notification. Returns `None` when no PDF file was found.
///
/// # Errors
///
/// Returns an error if an input directory cannot be listed.
pub async fn run_batch(
    inputs: &[PathBuf],
    options: BatchOptions,
    multi: &MultiProgress,
    notifier: &mut dyn Notify,
) -> Result<Option<BatchOutcome>, Box<dyn std::error::Error>> {
    let paths = collect_pdf_paths(inputs)?;

    if paths.is_empty() {
        notifier.notify(Level::Failure, "No PDF files found.");
        return Ok(None);
    }

    let progress: Arc<dyn ProgressCallback> = ExtractionBar::new(multi, "Extracting");
    let outcome = extract_batch(&paths, Arc::new(PdfExtractSource), options, &progress).await;

    for failure in &outcome.failures {
        notifier.notify(Level::Failure, &failure.error.to_string());
    }

    Ok(Some(outcome))
}

/// Prints `records` to stdout in `format`.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub fn print_records(
    records: &[ExtractionRecord],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = render(records, format)?;
    if rendered.is_empty() || rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

/// Copies the summary of `records` and notifies the outcome. Returns
/// whether the copy succeeded.
pub fn copy_with_notice(
    records: &[ExtractionRecord],
    clipboard: &ClipboardConfig,
    notifier: &mut dyn Notify,
) -> bool {
    let text = summary_text(records);
    let lines = matched(records).len();

    match copy_summary(&text, clipboard) {
        Ok(method) => {
            notifier.notify(
                Level::Success,
                &format!("Copied {lines} line(s) to the clipboard via {method}."),
            );
            true
        }
        Err(e) => {
            notifier.notify(Level::Failure, &format!("Failed to copy to the clipboard: {e}"));
            false
        }
    }
}
