//! # News Search
//!
//! A terminal front end for a news archive's article search API. It searches
//! a seed query on startup, re-searches whenever the user submits a new query
//! (debounced), shows the results as cards with share links, opens a detail
//! panel for one article, and can read headlines and lead paragraphs aloud
//! through an external speech program.
//!
//! ## Usage
//!
//! ```sh
//! # Interactive UI
//! NYT_API_KEY=YOUR_KEY news_search --query climate
//!
//! # One-shot search to stdout
//! news_search --print --json --query elections
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: [`cli`] flags and env vars over an optional YAML file ([`config`])
//! 2. **Search**: [`api::SearchClient`] maps upstream documents into [`models::Article`]s
//! 3. **State**: [`state::update`] applies messages; [`app::Shell`] owns the
//!    state, the [`debounce::Debouncer`] and the speech backend
//! 4. **Output**: [`tui`] draws [`view`] models; [`outputs`] serves `--print`

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod app;
mod cli;
mod config;
mod debounce;
mod error;
mod models;
mod outputs;
mod share;
mod speech;
mod state;
mod tui;
mod utils;
mod view;

use api::SearchClient;
use app::Shell;
use cli::Cli;
use config::{FileSettings, Settings};
use outputs::{Format, PrintOutcome, print_search};
use speech::{CommandSynthesizer, NullSynthesizer, Synthesizer};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Cli::parse();
    let file = match args.config.as_deref() {
        Some(path) => FileSettings::load(path)?,
        None => FileSettings::default(),
    };
    let settings = Settings::resolve(&args, file)?;

    // The UI owns the terminal, so its logs go to a file.
    if args.print {
        init_tracing(None)?;
    } else {
        init_tracing(Some(&settings.log_file))?;
    }

    let start_time = std::time::Instant::now();
    info!(
        endpoint = %settings.endpoint,
        query = %settings.query,
        quiet_window_ms = settings.quiet_window.as_millis() as u64,
        config = ?args.config,
        "news_search starting up"
    );
    if settings.api_key.is_empty() {
        warn!("No API key configured; search requests will be rejected upstream");
    }

    let client = SearchClient::from_settings(&settings);

    let mut exit = ExitCode::SUCCESS;
    if args.print {
        let format = if args.json { Format::Json } else { Format::Text };
        let outcome = print_search(
            &client,
            &settings.query,
            format,
            &mut io::stdout(),
            &mut io::stderr(),
        )
        .await?;
        if outcome == PrintOutcome::Unavailable {
            exit = ExitCode::FAILURE;
        }
    } else {
        let synth: Arc<dyn Synthesizer> = match CommandSynthesizer::new(&settings.speech_command) {
            Some(synth) => {
                info!(program = synth.program(), "Speech enabled");
                Arc::new(synth)
            }
            None => {
                warn!("No speech command configured; speech disabled");
                Arc::new(NullSynthesizer)
            }
        };
        let shell = Shell::new(
            settings.query.clone(),
            Arc::new(client),
            synth,
            settings.quiet_window,
        );
        tui::run(shell, settings.open_command.clone()).await?;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(exit)
}

/// Install the global subscriber. `None` logs to stderr.
fn init_tracing(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(UtcTime::rfc_3339());

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
