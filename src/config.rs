//! Runtime settings.
//!
//! Values are resolved in this order, first hit wins:
//! 1. command-line flag
//! 2. environment variable (handled by `clap`)
//! 3. the YAML file passed with `--config`
//! 4. built-in default

use crate::cli::Cli;
use crate::debounce::DEFAULT_QUIET_WINDOW;
use crate::error::ConfigError;
use crate::state::DEFAULT_QUERY;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Article search endpoint used when nothing else is configured.
pub static DEFAULT_ENDPOINT: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://api.nytimes.com/svc/search/v2/articlesearch.json")
        .expect("default endpoint is a valid URL")
});

const DEFAULT_LOG_FILE: &str = "news_search.log";

#[cfg(target_os = "macos")]
const DEFAULT_SPEECH_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SPEECH_COMMAND: &str = "espeak";

#[cfg(target_os = "macos")]
const DEFAULT_OPEN_COMMAND: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPEN_COMMAND: &str = "xdg-open";

/// Contents of the optional YAML file. Every key may be omitted.
///
/// ```yaml
/// api_key: abc123
/// query: climate
/// debounce_ms: 750
/// speech_command: espeak -s 150
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub api_key: Option<String>,
    pub query: Option<String>,
    pub endpoint: Option<String>,
    pub debounce_ms: Option<u64>,
    pub speech_command: Option<String>,
    pub open_command: Option<String>,
    pub log_file: Option<String>,
}

impl FileSettings {
    /// Parse YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a YAML file.
    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let settings = Self::from_yaml(&text)?;
        info!(path, "Loaded configuration");
        Ok(settings)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// May be empty; the request is still sent and the API rejects it.
    pub api_key: String,
    pub query: String,
    pub endpoint: Url,
    pub quiet_window: Duration,
    /// Program followed by its leading arguments.
    pub speech_command: Vec<String>,
    pub open_command: Vec<String>,
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            query: DEFAULT_QUERY.to_string(),
            endpoint: DEFAULT_ENDPOINT.clone(),
            quiet_window: DEFAULT_QUIET_WINDOW,
            speech_command: vec![DEFAULT_SPEECH_COMMAND.to_string()],
            open_command: vec![DEFAULT_OPEN_COMMAND.to_string()],
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Merge CLI/env values over the file values over the defaults.
    ///
    /// # Arguments
    ///
    /// * `cli` - Parsed flags; `clap` has already folded in environment variables
    /// * `file` - Contents of the `--config` file, or [`FileSettings::default`]
    ///
    /// # Returns
    ///
    /// The resolved settings, or a [`ConfigError`] when the endpoint is not a
    /// URL or a command line has unbalanced quotes.
    pub fn resolve(cli: &Cli, file: FileSettings) -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let api_key = cli.api_key.clone().or(file.api_key).unwrap_or_default();

        let endpoint = match cli.endpoint.clone().or(file.endpoint) {
            Some(raw) => Url::parse(&raw)?,
            None => defaults.endpoint,
        };

        let quiet_window = cli
            .debounce_ms
            .or(file.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.quiet_window);

        let speech_command = match cli.speech_command.clone().or(file.speech_command) {
            Some(command) => split_command(&command)?,
            None => defaults.speech_command,
        };
        let open_command = match cli.open_command.clone().or(file.open_command) {
            Some(command) => split_command(&command)?,
            None => defaults.open_command,
        };

        Ok(Self {
            api_key,
            query: cli.query.clone().or(file.query).unwrap_or(defaults.query),
            endpoint,
            quiet_window,
            speech_command,
            open_command,
            log_file: cli.log_file.clone().or(file.log_file).unwrap_or(defaults.log_file),
        })
    }
}

/// Split a command line into program and arguments with shell quoting rules.
///
/// # Arguments
///
/// * `command` - e.g. `say -v "Good News"`
///
/// # Returns
///
/// The words with quotes removed (`["say", "-v", "Good News"]`). An empty
/// command yields an empty list; unbalanced quotes are an error.
pub fn split_command(command: &str) -> Result<Vec<String>, ConfigError> {
    shell_words::split(command).map_err(|source| ConfigError::InvalidCommand {
        command: command.to_string(),
        source,
    })
}
