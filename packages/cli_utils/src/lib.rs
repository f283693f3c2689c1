#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the cnis-extract binary.
//!
//! [`ExtractionBar`] draws batch extraction progress (files done, the file
//! being decoded, records found so far) and [`init_logger`] routes `log`
//! output through `indicatif-log-bridge` so log lines never tear the bar.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cnis_extract_pdf::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::{MultiProgress, ProgressDrawTarget};

/// Filter used when neither `CNIS_EXTRACT_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

const BAR_TEMPLATE: &str = "{spinner:.cyan} {prefix} {bar:30.cyan/dim} {pos}/{len} {msg}";

/// Progress bar for one extraction batch.
pub struct ExtractionBar {
    bar: ProgressBar,
    records: AtomicUsize,
    failed: AtomicUsize,
}

impl ExtractionBar {
    /// Adds a bar labelled `label` to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress, label: &str) -> Arc<Self> {
        let bar = multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(label.to_owned());
        bar.enable_steady_tick(Duration::from_millis(120));

        Arc::new(Self {
            bar,
            records: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        })
    }

    fn status(&self, current: Option<&str>) -> String {
        status_line(
            current,
            self.records.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

impl ProgressCallback for ExtractionBar {
    fn batch_started(&self, files: usize) {
        self.bar.set_length(files as u64);
        self.bar.set_position(0);
        self.bar.set_message(self.status(None));
    }

    fn file_started(&self, file_name: &str) {
        self.bar.set_message(self.status(Some(file_name)));
    }

    fn file_finished(&self, _file_name: &str, records: Option<usize>) {
        match records {
            Some(n) => self.records.fetch_add(n, Ordering::Relaxed),
            None => self.failed.fetch_add(1, Ordering::Relaxed),
        };
        self.bar.inc(1);
        self.bar.set_message(self.status(None));
    }

    fn batch_finished(&self, records: usize, failed: usize) {
        self.bar
            .finish_with_message(status_line(None, records, failed));
    }
}

/// Message shown next to the bar.
fn status_line(current: Option<&str>, records: usize, failed: usize) -> String {
    let mut line = format!("{records} record(s)");
    if failed > 0 {
        line.push_str(&format!(", {failed} failed"));
    }
    if let Some(file) = current {
        line.push_str(&format!(" · {file}"));
    }
    line
}

/// Installs `pretty_env_logger` behind `indicatif-log-bridge`.
///
/// Filters come from `CNIS_EXTRACT_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_LOG_FILTER`]. Every bar must be added to the returned
/// [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let filters = std::env::var("CNIS_EXTRACT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());

    let logger = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
