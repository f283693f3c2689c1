#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Clipboard writes for the extracted summary.
//!
//! The native path goes through the platform clipboard (`copypasta`).
//! When that clipboard cannot be opened (no display server, headless
//! session), the text is staged in a temporary file that is fed to the
//! first installed legacy copy program and then removed, whatever the
//! program's outcome. As a last resort the text is sent to the terminal
//! as an OSC 52 escape, which most terminal emulators forward to the
//! local clipboard (also over SSH).

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use console::Term;
use copypasta::{ClipboardContext, ClipboardProvider};
use serde::{Deserialize, Serialize};

/// Errors that can occur while writing to the clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The platform clipboard was opened but refused the text.
    #[error("system clipboard rejected the text: {0}")]
    System(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A fallback program exists but could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The fallback program ran but reported failure.
    #[error("{program} exited with status {code:?}")]
    ExitStatus {
        /// Program that failed.
        program: String,
        /// Exit code, if the program was not killed by a signal.
        code: Option<i32>,
    },

    /// The temporary file for the fallback path could not be written or
    /// removed.
    #[error("failed to stage clipboard text: {0}")]
    Stage(#[source] std::io::Error),

    /// Writing the OSC 52 escape to the terminal failed.
    #[error("failed to write clipboard escape to the terminal: {0}")]
    Terminal(#[source] std::io::Error),

    /// Neither the platform clipboard, a fallback program nor a terminal
    /// is available.
    #[error("no clipboard available")]
    Unavailable,
}

/// A program plus its fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ClipboardCommand {
    /// Creates a command from a program and its arguments.
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_owned(),
            args: args.iter().map(|&a| a.to_owned()).collect(),
        }
    }
}

/// Which clipboard paths to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Write through the platform clipboard first.
    pub system: bool,
    /// Programs that read the staged file on stdin, tried in order when
    /// the platform clipboard cannot be opened. Programs that are not
    /// installed are skipped.
    pub fallback_programs: Vec<ClipboardCommand>,
    /// Emit an OSC 52 escape on stderr when no fallback program is
    /// installed and stderr is a terminal.
    pub terminal_escape: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            system: true,
            fallback_programs: vec![
                ClipboardCommand::new("wl-copy", &[]),
                ClipboardCommand::new("xclip", &["-selection", "clipboard"]),
                ClipboardCommand::new("xsel", &["--clipboard", "--input"]),
                ClipboardCommand::new("pbcopy", &[]),
                ClipboardCommand::new("clip", &[]),
            ],
            terminal_escape: true,
        }
    }
}

/// How the text reached the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyMethod {
    /// Written through the platform clipboard.
    System,
    /// Staged in a temporary file and fed to a fallback program.
    StagedFile {
        /// The fallback program.
        program: String,
    },
    /// Sent to the terminal as an OSC 52 escape.
    TerminalEscape,
}

impl fmt::Display for CopyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("the system clipboard"),
            Self::StagedFile { program } => write!(f, "{program} (staged file)"),
            Self::TerminalEscape => f.write_str("a terminal escape (OSC 52)"),
        }
    }
}

/// Copies `text` to the clipboard.
///
/// The fallbacks only run when the platform clipboard cannot be opened.
/// A clipboard or program that accepts the job and then fails is
/// reported as is.
///
/// # Errors
///
/// Returns [`ClipboardError`] if no path manages to copy the text.
pub fn copy_summary(text: &str, config: &ClipboardConfig) -> Result<CopyMethod, ClipboardError> {
    copy_with(
        text,
        config,
        write_system,
        &Term::stderr(),
        &std::env::temp_dir(),
    )
}

fn copy_with(
    text: &str,
    config: &ClipboardConfig,
    system: impl FnOnce(&str) -> Result<(), ClipboardError>,
    term: &Term,
    staging_dir: &Path,
) -> Result<CopyMethod, ClipboardError> {
    if config.system {
        match system(text) {
            Ok(()) => return Ok(CopyMethod::System),
            Err(ClipboardError::Unavailable) => {
                log::debug!("System clipboard unavailable, trying fallbacks");
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(program) = write_staged(text, &config.fallback_programs, staging_dir)? {
        return Ok(CopyMethod::StagedFile { program });
    }

    if config.terminal_escape && term.is_term() {
        let mut out = term;
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(ClipboardError::Terminal)?;
        log::debug!("Copied {} bytes via OSC 52", text.len());
        return Ok(CopyMethod::TerminalEscape);
    }

    Err(ClipboardError::Unavailable)
}

fn write_system(text: &str) -> Result<(), ClipboardError> {
    let mut ctx = ClipboardContext::new().map_err(|e| {
        log::debug!("Cannot open system clipboard: {e}");
        ClipboardError::Unavailable
    })?;

    ctx.set_contents(text.to_owned())
        .map_err(ClipboardError::System)?;

    log::debug!("Copied {} bytes via the system clipboard", text.len());
    Ok(())
}

/// Stages `text` in a temporary file under `dir` and feeds it to the first
/// installed program. Returns the program's name, or `None` when none is
/// installed. The file is removed before returning, on every path.
fn write_staged(
    text: &str,
    programs: &[ClipboardCommand],
    dir: &Path,
) -> Result<Option<String>, ClipboardError> {
    if programs.is_empty() {
        return Ok(None);
    }

    let mut staged = tempfile::Builder::new()
        .prefix("cnis-extract-")
        .suffix(".txt")
        .tempfile_in(dir)
        .map_err(ClipboardError::Stage)?;

    staged
        .write_all(text.as_bytes())
        .and_then(|()| staged.flush())
        .map_err(ClipboardError::Stage)?;

    let result = feed_first_installed(&staged, programs);

    staged.close().map_err(ClipboardError::Stage)?;

    result
}

fn feed_first_installed(
    staged: &tempfile::NamedTempFile,
    programs: &[ClipboardCommand],
) -> Result<Option<String>, ClipboardError> {
    for candidate in programs {
        let stdin = staged.reopen().map_err(ClipboardError::Stage)?;

        let status = Command::new(&candidate.program)
            .args(&candidate.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        let status = match status {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::trace!("Clipboard program {} not installed", candidate.program);
                continue;
            }
            Err(e) => {
                return Err(ClipboardError::Spawn {
                    program: candidate.program.clone(),
                    source: e,
                });
            }
        };

        if !status.success() {
            return Err(ClipboardError::ExitStatus {
                program: candidate.program.clone(),
                code: status.code(),
            });
        }

        log::debug!("Copied staged file via {}", candidate.program);
        return Ok(Some(candidate.program.clone()));
    }

    Ok(None)
}

/// The OSC 52 "set clipboard" escape carrying `text`.
#[must_use]
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}
