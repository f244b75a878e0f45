//! Error types shared across the application.
//!
//! Every failure of a search request collapses to a single user-facing
//! message ([`UNAVAILABLE_MESSAGE`]); the variants of [`SearchError`] only
//! exist so the logs say what actually went wrong.

use std::io;
use thiserror::Error;

/// The only text ever shown to the user when a search fails.
pub const UNAVAILABLE_MESSAGE: &str = "Service is not available. Please try again later.";

/// A search request failed. No variant is retried.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Connection, TLS or body read failure.
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("search request failed: HTTP {status}")]
    Status { status: u16 },

    /// The body was not the expected JSON envelope.
    #[error("search request failed: malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Speech synthesis failures. These are logged and never reach application state.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("failed to start speech command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("speech command `{program}` exited with {code:?}")]
    Exit { program: String, code: Option<i32> },
}

/// Problems loading the optional YAML settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("invalid command line `{command}`: {source}")]
    InvalidCommand {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },
}
