//! Per-file progress events for batch extraction.

use std::sync::Arc;

/// Observes a batch as it moves from file to file.
///
/// Files may overlap when the batch runs with `jobs > 1`, so
/// `file_started` and `file_finished` calls for different files can
/// interleave.
pub trait ProgressCallback: Send + Sync {
    /// The batch is about to read `files` files.
    fn batch_started(&self, files: usize);

    /// `file_name` is being read and decoded.
    fn file_started(&self, file_name: &str);

    /// `file_name` is done. `records` is `None` if the file failed.
    fn file_finished(&self, file_name: &str, records: Option<usize>);

    /// Every file has been handled.
    fn batch_finished(&self, records: usize, failed: usize);
}

/// Ignores every event.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn batch_started(&self, _files: usize) {}
    fn file_started(&self, _file_name: &str) {}
    fn file_finished(&self, _file_name: &str, _records: Option<usize>) {}
    fn batch_finished(&self, _records: usize, _failed: usize) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
