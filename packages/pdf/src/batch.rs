//! Batch extraction over a set of selected files.
//!
//! A batch is processed file by file (or with bounded concurrency when
//! `jobs > 1`), but results are always yielded in input order so the
//! combined record list reads file-then-page-then-left-to-right. A file
//! that fails to read or decode is reported as a [`FileFailure`] and does
//! not affect the records of any other file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cnis_extract_models::{EmptyPagePolicy, ExtractionRecord};
use futures::stream::{self, StreamExt as _};

use crate::progress::ProgressCallback;
use crate::{PdfError, TextSource, extract_document};

/// Options for one batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// How many files may be decoded at the same time. `1` processes the
    /// batch strictly sequentially; `0` is treated as `1`.
    pub jobs: usize,
    /// What to emit for pages with no match.
    pub empty_pages: EmptyPagePolicy,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            empty_pages: EmptyPagePolicy::Skip,
        }
    }
}

/// A file whose extraction failed.
#[derive(Debug)]
pub struct FileFailure {
    /// The path as it was given to the batch.
    pub path: PathBuf,
    /// Why the file contributed no records.
    pub error: PdfError,
}

/// Everything a batch produced.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records of every successful file, in input order.
    pub records: Vec<ExtractionRecord>,
    /// Files that failed, in input order.
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    /// Whether every file in the batch was extracted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Returns the display name used in records for `path`.
fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Reads and extracts a single file.
///
/// The read happens on the async runtime; decoding runs on a blocking
/// thread since `pdf-extract` is CPU-bound.
///
/// # Errors
///
/// Returns [`PdfError::FileRead`] if the file cannot be read,
/// [`PdfError::Decode`] if it is not a decodable PDF, or
/// [`PdfError::Join`] if the decode task dies.
pub async fn extract_file(
    path: &Path,
    source: Arc<dyn TextSource>,
    policy: EmptyPagePolicy,
) -> Result<Vec<ExtractionRecord>, PdfError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PdfError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let name = file_name(path);

    log::debug!("Read {} bytes from {}", bytes.len(), path.display());

    tokio::task::spawn_blocking(move || {
        extract_document(&bytes, &name, source.as_ref(), policy)
    })
    .await?
}

/// Extracts every file in `paths`.
///
/// Failures are collected per file; records already gathered from other
/// files are kept.
pub async fn extract_batch(
    paths: &[PathBuf],
    source: Arc<dyn TextSource>,
    options: BatchOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> BatchOutcome {
    let jobs = options.jobs.max(1);

    log::info!(
        "Extracting {} file(s) (jobs={jobs}, empty pages={})",
        paths.len(),
        options.empty_pages
    );

    progress.batch_started(paths.len());

    let results: Vec<_> = stream::iter(paths.iter().map(|path| {
        let source = Arc::clone(&source);
        async move {
            let name = file_name(path);
            progress.file_started(&name);
            let result = extract_file(path, source, options.empty_pages).await;
            progress.file_finished(&name, result.as_ref().ok().map(Vec::len));
            (path, result)
        }
    }))
    .buffered(jobs)
    .collect()
    .await;

    let mut outcome = BatchOutcome::default();

    for (path, result) in results {
        match result {
            Ok(records) => {
                log::info!("{}: {} record(s)", path.display(), records.len());
                outcome.records.extend(records);
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                outcome.failures.push(FileFailure {
                    path: path.clone(),
                    error: e,
                });
            }
        }
    }

    progress.batch_finished(outcome.records.len(), outcome.failures.len());

    outcome
}

/// Expands input paths into the list of files to extract.
///
/// Directories are replaced by their `*.pdf` children (extension checked
/// case-insensitively, sorted by name, not recursive). Any other path is
/// kept as given, so a missing or non-PDF file surfaces as a per-file
/// failure later.
///
/// # Errors
///
/// Returns [`PdfError::Io`] if a directory cannot be listed.
pub fn collect_pdf_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, PdfError> {
    let mut paths = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }

        let mut children = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if is_pdf && path.is_file() {
                children.push(path);
            }
        }
        children.sort();

        log::debug!("{}: {} PDF file(s)", input.display(), children.len());

        paths.extend(children);
    }

    Ok(paths)
}
