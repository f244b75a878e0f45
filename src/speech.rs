//! Text-to-speech dispatch.
//!
//! Speaking is fire-and-forget: [`Synthesizer::speak`] returns immediately,
//! and completion or failure of the utterance is only logged. Nothing here
//! feeds back into application state, and utterances are neither cancelled
//! nor sequenced beyond what the speech program itself does.

use crate::error::SpeechError;
use crate::models::Article;
use crate::utils::{run_command, truncate_for_log};
use std::fmt;
use tracing::{debug, error, info};

/// Something that can say a piece of text.
pub trait Synthesizer: Send + Sync {
    fn speak(&self, text: String);
}

/// Speaks by running an external program (`espeak`, `say`, ...) once per
/// utterance, with the text as its last argument.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// Build from a split command line. Returns `None` for an empty command.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn utter(program: &str, args: &[String], text: &str) -> Result<(), SpeechError> {
        match run_command(program, args, text).await {
            Ok(Some(0)) => Ok(()),
            Ok(code) => Err(SpeechError::Exit {
                program: program.to_string(),
                code,
            }),
            Err(source) => Err(SpeechError::Spawn {
                program: program.to_string(),
                source,
            }),
        }
    }
}

impl fmt::Debug for CommandSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSynthesizer")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish()
    }
}

impl Synthesizer for CommandSynthesizer {
    fn speak(&self, text: String) {
        if text.trim().is_empty() {
            debug!("Skipping empty utterance");
            return;
        }
        let program = self.program.clone();
        let args = self.args.clone();
        tokio::spawn(async move {
            let preview = truncate_for_log(&text, 60);
            match Self::utter(&program, &args, &text).await {
                Ok(()) => debug!(utterance = %preview, "Utterance ended"),
                Err(e) => error!(utterance = %preview, error = %e, "Utterance failed"),
            }
        });
    }
}

/// Logs utterances instead of speaking them. Used when no speech command is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSynthesizer;

impl Synthesizer for NullSynthesizer {
    fn speak(&self, text: String) {
        info!(utterance = %truncate_for_log(&text, 60), "Speech disabled; not speaking");
    }
}

/// Read the lead paragraph of one article.
pub fn speak_lead(synth: &dyn Synthesizer, article: &Article) {
    synth.speak(article.lead_paragraph.clone());
}

/// Queue one utterance per headline, in list order.
pub fn speak_headlines(synth: &dyn Synthesizer, articles: &[Article]) {
    info!(count = articles.len(), "Speaking headlines");
    for article in articles {
        synth.speak(article.headline_text().to_string());
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Synthesizer;
    use std::sync::{Arc, Mutex};

    /// Records every utterance.
    #[derive(Debug, Default, Clone)]
    pub struct RecordingSynthesizer {
        pub spoken: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSynthesizer {
        pub fn spoken(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }
    }

    impl Synthesizer for RecordingSynthesizer {
        fn speak(&self, text: String) {
            self.spoken.lock().unwrap().push(text);
        }
    }
}
