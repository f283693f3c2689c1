//! Interactive front end.
//!
//! A `dialoguer` menu toggles between the extractor view and the
//! placeholder view until the user exits. Each extractor run replaces the
//! previous results.

use std::path::PathBuf;

use cnis_extract_cli_utils::MultiProgress;
use cnis_extract_models::OutputFormat;
use cnis_extract_report::matched;
use dialoguer::{Confirm, Input, Select};

use crate::app::{AppState, View};
use crate::config::Config;
use crate::extract::{copy_with_notice, print_records, run_batch};
use crate::notify::{Level, Notify, TermNotifier};

/// Runs the interactive menu loop.
///
/// # Errors
///
/// Returns an error if a prompt fails.
pub async fn run(multi: &MultiProgress, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = AppState::default();
    let mut notifier = TermNotifier::stderr(true);

    let mut labels: Vec<&str> = View::ALL.iter().map(|v| v.label()).collect();
    labels.push("Exit");

    loop {
        let current = View::ALL
            .iter()
            .position(|&v| v == state.view())
            .unwrap_or_default();

        let idx = Select::new()
            .with_prompt(format!("Which view? ({})", state.status()))
            .items(&labels)
            .default(current)
            .interact()?;

        let Some(&view) = View::ALL.get(idx) else {
            return Ok(());
        };
        state.select_view(view);

        match state.view() {
            View::Extractor => extractor_view(&mut state, multi, config, &mut notifier).await?,
            View::Placeholder => placeholder_view(&state),
        }
    }
}

/// Prompts for input paths until an empty line is entered.
fn prompt_paths() -> Result<Vec<PathBuf>, dialoguer::Error> {
    let mut paths = Vec::new();

    loop {
        let prompt = if paths.is_empty() {
            "PDF file or directory"
        } else {
            "Another file or directory (empty to start)"
        };

        let input: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(paths);
        }
        paths.push(PathBuf::from(input));
    }
}

async fn extractor_view(
    state: &mut AppState,
    multi: &MultiProgress,
    config: &Config,
    notifier: &mut TermNotifier,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("CNIS PDF field extractor");

    let inputs = prompt_paths()?;
    if inputs.is_empty() {
        println!("No files selected.");
        return Ok(());
    }

    let options = config.extract.batch_options(None, None);

    state.start_batch();
    println!("{}", state.status());
    let outcome = run_batch(&inputs, options, multi, notifier).await;
    let records = match outcome {
        Ok(outcome) => outcome.map(|o| o.records).unwrap_or_default(),
        Err(e) => {
            state.finish_batch(Vec::new());
            notifier.notify(Level::Failure, &e.to_string());
            return Ok(());
        }
    };
    state.finish_batch(records);

    show_results(state)?;

    if !matched(state.results()).is_empty()
        && Confirm::new()
            .with_prompt("Copy to the clipboard?")
            .default(true)
            .interact()?
    {
        copy_with_notice(state.results(), &config.clipboard, notifier);
    }

    Ok(())
}

fn show_results(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("Results:");
    print_records(state.results(), OutputFormat::Table)
}

fn placeholder_view(state: &AppState) {
    println!("{}: nothing to show here.", state.view().label());
}
