//! Interactive application state.
//!
//! [`AppState`] is owned by the interactive controller loop. Views only
//! receive `&AppState`, so the selected view, the current results and the
//! loading flag change in exactly one place.

use cnis_extract_models::ExtractionRecord;

/// The views reachable from the top-level menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// PDF field extraction.
    #[default]
    Extractor,
    /// A view with no behavior of its own.
    Placeholder,
}

impl View {
    pub const ALL: &[Self] = &[Self::Extractor, Self::Placeholder];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Extractor => "CNIS extractor",
            Self::Placeholder => "SP (placeholder)",
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    view: View,
    results: Vec<ExtractionRecord>,
    loading: bool,
}

impl AppState {
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn results(&self) -> &[ExtractionRecord] {
        &self.results
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn select_view(&mut self, view: View) {
        self.view = view;
    }

    /// Marks a batch as running.
    pub const fn start_batch(&mut self) {
        self.loading = true;
    }

    /// One-line description of where the extractor stands.
    #[must_use]
    pub fn status(&self) -> String {
        if self.is_loading() {
            "Processing...".to_owned()
        } else if self.results.is_empty() {
            "no results yet".to_owned()
        } else {
            let matched = self.results.iter().filter(|r| r.is_match()).count();
            format!("{matched} value(s) from the last run")
        }
    }

    /// Replaces the previous batch's results wholesale.
    pub fn finish_batch(&mut self, records: Vec<ExtractionRecord>) {
        self.results = records;
        self.loading = false;
    }
}
