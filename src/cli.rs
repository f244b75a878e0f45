//! Command-line interface definitions for News Search.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Most options can also come from environment variables or from the YAML
//! file named by `--config`; see [`crate::config`] for precedence.

use clap::Parser;

/// Command-line arguments for the News Search application.
///
/// # Examples
///
/// ```sh
/// # Interactive terminal UI seeded with the default query
/// NYT_API_KEY=YOUR_KEY news_search
///
/// # Different seed query and a slower debounce window
/// news_search --query "climate" --debounce-ms 800
///
/// # One-shot search printed as JSON
/// news_search --print --json --query "elections"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// New York Times API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Query searched automatically on startup
    #[arg(short, long)]
    pub query: Option<String>,

    /// Article search endpoint
    #[arg(long, env = "NEWS_SEARCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Quiet window in milliseconds before a search request is sent
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Text-to-speech command; the utterance is appended as the last argument
    #[arg(long, env = "NEWS_SEARCH_SPEECH_COMMAND")]
    pub speech_command: Option<String>,

    /// Command used to open article links
    #[arg(long)]
    pub open_command: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log file used while the terminal UI owns the screen
    #[arg(long)]
    pub log_file: Option<String>,

    /// Run the seed query once and print the results instead of starting the UI
    #[arg(short, long)]
    pub print: bool,

    /// With --print, emit the article list as JSON
    #[arg(long, requires = "print")]
    pub json: bool,
}
