//! TOML configuration for the CLI.
//!
//! The file is optional. It is looked up from `--config`, then from the
//! `CNIS_EXTRACT_CONFIG` environment variable; without either, built-in
//! defaults apply. Command-line flags override file values.

use std::path::{Path, PathBuf};

use cnis_extract_clipboard::ClipboardConfig;
use cnis_extract_models::EmptyPagePolicy;
use cnis_extract_pdf::BatchOptions;
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "CNIS_EXTRACT_CONFIG";

/// Errors that can occur while loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// What the parser reported.
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Batch extraction settings.
    pub extract: ExtractConfig,
    /// Clipboard programs.
    pub clipboard: ClipboardConfig,
}

/// The `[extract]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Files decoded at the same time.
    pub jobs: usize,
    /// What to emit for pages without a match.
    pub empty_pages: EmptyPagePolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        let defaults = BatchOptions::default();
        Self {
            jobs: defaults.jobs,
            empty_pages: defaults.empty_pages,
        }
    }
}

impl ExtractConfig {
    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub fn batch_options(
        self,
        jobs: Option<usize>,
        empty_pages: Option<EmptyPagePolicy>,
    ) -> BatchOptions {
        BatchOptions {
            jobs: jobs.unwrap_or(self.jobs),
            empty_pages: empty_pages.unwrap_or(self.empty_pages),
        }
    }
}

/// Parses a config file's contents.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `contents` is not a valid config.
pub fn parse(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Loads the config from `explicit`, else from [`CONFIG_ENV_VAR`], else
/// returns the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if a named config file cannot be read or
/// parsed.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let Some(path) = path else {
        log::debug!("No config file given, using defaults");
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;

    log::debug!("Loaded config from {}", path.display());

    parse(&path, &contents)
}

#[cfg(test)]
mod tests {
    use cnis_extract_clipboard::ClipboardCommand;

    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = parse(Path::new("c.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.extract.jobs, 1);
        assert_eq!(config.extract.empty_pages, EmptyPagePolicy::Skip);
    }

    #[test]
    fn reads_extract_and_clipboard_tables() {
        let config = parse(
            Path::new("c.toml"),
            r#"
            [extract]
            jobs = 4
            empty_pages = "sentinel"

            [clipboard]
            system = false
            fallback_programs = [{ program = "xsel", args = ["--clipboard", "--input"] }]
            "#,
        )
        .unwrap();

        assert_eq!(config.extract.jobs, 4);
        assert_eq!(config.extract.empty_pages, EmptyPagePolicy::Sentinel);
        assert!(!config.clipboard.system);
        assert_eq!(
            config.clipboard.fallback_programs,
            vec![ClipboardCommand::new("xsel", &["--clipboard", "--input"])]
        );
        assert!(config.clipboard.terminal_escape);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse(Path::new("c.toml"), "[extract]\nthreads = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("c.toml"));
    }

    #[test]
    fn flags_override_file_values() {
        let file = ExtractConfig {
            jobs: 3,
            empty_pages: EmptyPagePolicy::Sentinel,
        };

        let options = file.batch_options(Some(8), None);
        assert_eq!(options.jobs, 8);
        assert_eq!(options.empty_pages, EmptyPagePolicy::Sentinel);

        let options = file.batch_options(None, Some(EmptyPagePolicy::Skip));
        assert_eq!(options.jobs, 3);
        assert_eq!(options.empty_pages, EmptyPagePolicy::Skip);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
