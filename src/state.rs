//! Application state and its transition function.
//!
//! [`AppState`] is plain data. All changes go through [`update`], which
//! applies one [`Msg`] and returns the [`Effect`]s the owner must carry out.
//! Nothing in here touches the network, the clock or the terminal.

use crate::models::Article;
use tracing::{debug, info, warn};

/// Query searched automatically on startup.
pub const DEFAULT_QUERY: &str = "crypto";

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Search,
    List,
}

/// Discrete events that can change the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The search text was edited. Does not search by itself.
    QueryChanged(String),
    /// Search icon or Enter. Routed through the debouncer.
    SearchRequested,
    /// A request with this id is now in flight.
    SearchIssued { request: u64 },
    /// A request resolved. `None` means the response had nothing to apply.
    SearchSettled {
        request: u64,
        articles: Option<Vec<Article>>,
    },
    /// A request failed; `error` is kept for logging only.
    SearchFailed { request: u64, error: String },
    /// Open the detail panel for the card at this index.
    ArticleSelected(usize),
    DetailClosed,
    CursorMoved(isize),
    FocusChanged(Focus),
}

/// Work the owner of the state has to perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Restart the debounce window.
    TriggerSearch,
    /// Rebind the debouncer to the current query.
    WatchQuery(String),
}

/// What the main area shows.
#[derive(Debug, PartialEq)]
pub enum MainView<'a> {
    Articles(&'a [Article]),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub query: String,
    pub articles: Vec<Article>,
    /// Last opened record; kept after the panel closes.
    pub selected: Article,
    /// Set when the most recent request failed.
    pub error: Option<String>,
    pub detail_open: bool,
    /// Id of the most recently issued request; older results are dropped.
    pub latest_request: u64,
    pub focus: Focus,
    pub cursor: usize,
    /// Index of the first visible card.
    pub scroll: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY)
    }
}

impl AppState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            articles: Vec::new(),
            selected: Article::placeholder(),
            error: None,
            detail_open: false,
            latest_request: 0,
            focus: Focus::Search,
            cursor: 0,
            scroll: 0,
        }
    }

    /// The unavailability notice wins over any articles still held.
    pub fn main_view(&self) -> MainView<'_> {
        if self.error.is_some() {
            MainView::Unavailable
        } else {
            MainView::Articles(&self.articles)
        }
    }

    /// Card under the cursor, if the list is showing and non-empty.
    pub fn current_article(&self) -> Option<&Article> {
        match self.main_view() {
            MainView::Articles(articles) => articles.get(self.cursor),
            MainView::Unavailable => None,
        }
    }

    /// Adjust `scroll` so the cursor lies within `visible` cards.
    pub fn keep_cursor_visible(&mut self, visible: usize) {
        let visible = visible.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll.saturating_add(visible) {
            self.scroll = self.cursor + 1 - visible;
        }
    }

    fn scroll_to_top(&mut self) {
        self.cursor = 0;
        self.scroll = 0;
    }

    fn is_stale(&self, request: u64) -> bool {
        request < self.latest_request
    }
}

/// Apply one message.
///
/// # Arguments
///
/// * `state` - State to change in place
/// * `msg` - The event to apply
///
/// # Returns
///
/// The effects the caller must carry out, in order. Most messages return none.
pub fn update(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::QueryChanged(query) => {
            state.query = query;
            vec![Effect::WatchQuery(state.query.clone())]
        }
        Msg::SearchRequested => {
            debug!(query = %state.query, "Search requested");
            vec![Effect::TriggerSearch]
        }
        Msg::SearchIssued { request } => {
            state.latest_request = state.latest_request.max(request);
            Vec::new()
        }
        Msg::SearchSettled { request, articles } => {
            if state.is_stale(request) {
                warn!(request, latest = state.latest_request, "Dropping stale search result");
                return Vec::new();
            }
            if let Some(articles) = articles {
                info!(request, count = articles.len(), "Search results replaced");
                state.articles = articles;
                state.error = None;
            }
            state.scroll_to_top();
            Vec::new()
        }
        Msg::SearchFailed { request, error } => {
            if state.is_stale(request) {
                warn!(request, latest = state.latest_request, %error, "Dropping stale search failure");
                return Vec::new();
            }
            state.error = Some(error);
            state.scroll_to_top();
            Vec::new()
        }
        Msg::ArticleSelected(index) => {
            match state.articles.get(index) {
                Some(article) => {
                    state.selected = article.clone();
                    state.cursor = index;
                    state.detail_open = true;
                }
                None => debug!(index, "Ignoring selection outside the list"),
            }
            Vec::new()
        }
        Msg::DetailClosed => {
            state.detail_open = false;
            Vec::new()
        }
        Msg::CursorMoved(delta) => {
            if !state.articles.is_empty() {
                let last = state.articles.len() - 1;
                state.cursor = state.cursor.saturating_add_signed(delta).min(last);
            }
            Vec::new()
        }
        Msg::FocusChanged(focus) => {
            state.focus = focus;
            Vec::new()
        }
    }
}
