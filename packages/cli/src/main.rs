#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for CNIS PDF field extraction.
//!
//! `cnis_extract extract <PATHS>...` extracts reference/amount pairs from
//! the given PDFs (directories expand to the PDFs they contain), prints
//! them, and optionally copies the summary to the clipboard. Without a
//! subcommand an interactive menu is shown instead.
//!
//! Uses `indicatif-log-bridge` (via [`cnis_extract_cli_utils::init_logger`])
//! so log lines and the progress bar never fight for the terminal.

mod app;
mod config;
mod extract;
mod interactive;
mod notify;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cnis_extract_models::{EmptyPagePolicy, OutputFormat};

#[derive(Parser)]
#[command(name = "cnis_extract", about = "Extract reference/amount pairs from CNIS PDFs")]
struct Cli {
    /// TOML config file (overrides the `CNIS_EXTRACT_CONFIG` env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reference/amount pairs from PDF files
    Extract {
        /// PDF files, or directories whose `*.pdf` files are all extracted
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output format: `table`, `json` or `summary`
        #[arg(long, default_value = "table")]
        format: OutputFormat,
        /// Copy the summary to the system clipboard
        #[arg(long)]
        copy: bool,
        /// Number of files decoded at the same time
        #[arg(long)]
        jobs: Option<usize>,
        /// What to emit for pages without a match: `skip` or `sentinel`
        #[arg(long)]
        empty_pages: Option<EmptyPagePolicy>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let multi = cnis_extract_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        interactive::run(&multi, &config).await?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Extract {
            paths,
            format,
            copy,
            jobs,
            empty_pages,
        } => {
            let options = config.extract.batch_options(jobs, empty_pages);
            let mut notifier = notify::TermNotifier::stderr(false);
            let Some(outcome) = extract::run_batch(&paths, options, &multi, &mut notifier).await?
            else {
                return Ok(ExitCode::FAILURE);
            };

            extract::print_records(&outcome.records, format)?;

            let mut ok = outcome.is_complete();
            if copy {
                ok &= extract::copy_with_notice(&outcome.records, &config.clipboard, &mut notifier);
            }

            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_flags_parse_into_enums() {
        let cli = Cli::try_parse_from([
            "cnis_extract",
            "extract",
            "a.pdf",
            "--format",
            "json",
            "--empty-pages",
            "sentinel",
            "--jobs",
            "2",
        ])
        .unwrap();

        let Some(Commands::Extract {
            paths,
            format,
            copy,
            jobs,
            empty_pages,
        }) = cli.command
        else {
            panic!("expected the extract command");
        };
        assert_eq!(paths, vec![PathBuf::from("a.pdf")]);
        assert_eq!(format, OutputFormat::Json);
        assert!(!copy);
        assert_eq!(jobs, Some(2));
        assert_eq!(empty_pages, Some(EmptyPagePolicy::Sentinel));
    }

    #[test]
    fn extract_defaults_to_table() {
        let cli = Cli::try_parse_from(["cnis_extract", "extract", "dir", "--copy"]).unwrap();

        let Some(Commands::Extract { format, copy, .. }) = cli.command else {
            panic!("expected the extract command");
        };
        assert_eq!(format, OutputFormat::Table);
        assert!(copy);
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["cnis_extract"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["cnis_extract", "extract", "a.pdf", "--format", "csv"]).is_err());
    }
}
