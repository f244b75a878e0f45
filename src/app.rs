//! The application shell.
//!
//! [`Shell`] owns the [`AppState`] and everything that produces events for it:
//! the search backend, the debouncer and the speech synthesizer. Front ends
//! call the operation methods in response to user input and feed
//! [`Shell::next_event`] results back through [`Shell::handle`].
//!
//! ```text
//! set_query ─► WatchQuery ─► Debouncer::watch
//! submit    ─► TriggerSearch ─► Debouncer::trigger ─(quiet window)─► Fired
//! Fired / mount ─► fire_search ─► spawned search ─► Settled ─► update
//! ```
//!
//! Searches run as independent tasks and are never cancelled. Each one gets
//! an increasing request id, and the state drops results older than the
//! latest issued request.

use crate::api::{ArticleSearch, SearchResult};
use crate::debounce::Debouncer;
use crate::speech::{self, Synthesizer};
use crate::state::{AppState, Effect, Focus, Msg, update};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument};

/// Something the shell has to react to.
#[derive(Debug)]
pub enum ShellEvent {
    /// The debounce window elapsed for this query.
    Fired(String),
    /// A search resolved.
    Settled { request: u64, result: SearchResult },
}

pub struct Shell<S> {
    state: AppState,
    backend: Arc<S>,
    synth: Arc<dyn Synthesizer>,
    debouncer: Debouncer<String>,
    fired_rx: UnboundedReceiver<String>,
    settled_tx: UnboundedSender<(u64, SearchResult)>,
    settled_rx: UnboundedReceiver<(u64, SearchResult)>,
    next_request: u64,
    in_flight: usize,
}

impl<S: ArticleSearch> Shell<S> {
    /// Create a shell seeded with `query`. Nothing is fetched until [`Shell::mount`].
    pub fn new(
        query: impl Into<String>,
        backend: Arc<S>,
        synth: Arc<dyn Synthesizer>,
        quiet_window: Duration,
    ) -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let state = AppState::new(query);
        let mut debouncer = Debouncer::new(quiet_window, fired_tx);
        debouncer.watch(state.query.clone());

        Self {
            state,
            backend,
            synth,
            debouncer,
            fired_rx,
            settled_tx,
            settled_rx,
            next_request: 0,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Viewport bookkeeping for front ends.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Number of searches issued but not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn debounce_armed(&self) -> bool {
        self.debouncer.is_armed()
    }

    /// Run the seed query once, immediately.
    pub fn mount(&mut self) {
        info!(query = %self.state.query, "Mounting; running seed query");
        let query = self.state.query.clone();
        self.fire_search(query);
    }

    /// Record an edit of the search text. Never searches by itself.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::QueryChanged(text.into()));
    }

    /// Search icon or Enter. Goes through the debouncer.
    pub fn submit_search(&mut self) {
        self.dispatch(Msg::SearchRequested);
    }

    /// Enter in the search box: search and move focus off the input.
    pub fn submit_and_blur(&mut self) {
        self.submit_search();
        self.dispatch(Msg::FocusChanged(Focus::List));
    }

    pub fn focus(&mut self, focus: Focus) {
        self.dispatch(Msg::FocusChanged(focus));
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.dispatch(Msg::CursorMoved(delta));
    }

    /// Open the detail panel for the card at `index`.
    pub fn select_article(&mut self, index: usize) {
        self.dispatch(Msg::ArticleSelected(index));
    }

    /// Hide the detail panel. The selection is kept.
    pub fn close_detail(&mut self) {
        self.dispatch(Msg::DetailClosed);
    }

    /// Read the lead paragraph of the card under the cursor.
    pub fn speak_lead(&self) {
        if let Some(article) = self.state.current_article() {
            speech::speak_lead(self.synth.as_ref(), article);
        }
    }

    /// Read the lead paragraph of the article open in the detail panel.
    ///
    /// Unlike [`Shell::speak_lead`] this follows `selected`, which stays put
    /// when a later search moves the cursor.
    pub fn speak_selected(&self) {
        speech::speak_lead(self.synth.as_ref(), &self.state.selected);
    }

    /// Read every headline currently listed.
    pub fn speak_headlines(&self) {
        speech::speak_headlines(self.synth.as_ref(), &self.state.articles);
    }

    /// Wait for the next timer fire or search settlement.
    pub async fn next_event(&mut self) -> ShellEvent {
        tokio::select! {
            Some(query) = self.fired_rx.recv() => ShellEvent::Fired(query),
            Some((request, result)) = self.settled_rx.recv() => ShellEvent::Settled { request, result },
        }
    }

    pub fn handle(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Fired(query) => self.fire_search(query),
            ShellEvent::Settled { request, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let msg = match result {
                    Ok(articles) => Msg::SearchSettled { request, articles },
                    Err(e) => Msg::SearchFailed {
                        request,
                        error: e.to_string(),
                    },
                };
                self.dispatch(msg);
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        for effect in update(&mut self.state, msg) {
            match effect {
                Effect::TriggerSearch => {
                    debug!(
                        window_ms = self.debouncer.window().as_millis() as u64,
                        query = ?self.debouncer.watched(),
                        "Restarting debounce window"
                    );
                    self.debouncer.trigger();
                }
                Effect::WatchQuery(query) => self.debouncer.watch(query),
            }
        }
    }

    /// Issue one search for `query` in the background.
    ///
    /// # Arguments
    ///
    /// * `query` - Text to search; an empty query issues nothing
    ///
    /// # Returns
    ///
    /// Nothing. The outcome arrives later as [`ShellEvent::Settled`] carrying
    /// the request id allocated here.
    #[instrument(level = "info", skip(self))]
    fn fire_search(&mut self, query: String) {
        if query.is_empty() {
            debug!("Empty query; nothing to search");
            return;
        }

        self.next_request += 1;
        let request = self.next_request;
        self.in_flight += 1;
        self.dispatch(Msg::SearchIssued { request });

        let backend = Arc::clone(&self.backend);
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let result = backend.search(&query).await;
            // The shell may have been dropped while the request was in flight.
            let _ = tx.send((request, result));
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::SearchError;
    use crate::models::Article;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::sleep;

    /// Backend answering from a table, optionally after a delay.
    #[derive(Default)]
    pub struct ScriptedSearch {
        calls: Mutex<Vec<String>>,
        answers: HashMap<String, (Duration, Result<Vec<Article>, u16>)>,
    }

    impl ScriptedSearch {
        pub fn answer(mut self, query: &str, delay_ms: u64, answer: Result<Vec<Article>, u16>) -> Self {
            self.answers
                .insert(query.to_string(), (Duration::from_millis(delay_ms), answer));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ArticleSearch for ScriptedSearch {
        async fn search(&self, query: &str) -> SearchResult {
            if query.is_empty() {
                return Ok(None);
            }
            self.calls.lock().unwrap().push(query.to_string());
            let (delay, answer) = self
                .answers
                .get(query)
                .cloned()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            if !delay.is_zero() {
                sleep(delay).await;
            }
            match answer {
                Ok(articles) => Ok(Some(articles)),
                Err(status) => Err(SearchError::Status { status }),
            }
        }
    }

    pub fn article(headline: &str) -> Article {
        Article {
            headline: Some(headline.to_string()),
            url: format!("https://example.com/{}", headline),
            lead_paragraph: format!("Lead of {}", headline),
            ..Article::placeholder()
        }
    }

    /// Wait for one shell event and apply it.
    pub async fn pump<S: ArticleSearch>(shell: &mut Shell<S>) {
        let event = shell.next_event().await;
        shell.handle(event);
    }
}
