//! Full-screen terminal front end.
//!
//! Draws the search box, the article list (or the unavailability notice) and
//! the detail panel with `crossterm`, and translates key presses into
//! [`Shell`] operations. Terminal input and shell events are multiplexed with
//! `tokio::select!` on a single task.
//!
//! # Keys
//!
//! | Where | Key | Action |
//! |-------|-----|--------|
//! | search box | text, Backspace | edit the query |
//! | search box | Enter | search and move focus to the list |
//! | anywhere | Ctrl+R | search (the "icon") |
//! | list | Up/Down, k/j | move the cursor |
//! | list | Enter | open the detail panel |
//! | list | s / h | speak lead / speak all headlines |
//! | list | 1-7 | show a share link |
//! | list | / | back to the search box |
//! | detail | s | speak the open article's lead |
//! | detail | o | open the article link |
//! | detail | Esc, q | close the panel |
//! | anywhere | Ctrl+C, q (list) | quit |

use crate::api::ArticleSearch;
use crate::app::Shell;
use crate::error::UNAVAILABLE_MESSAGE;
use crate::share::ShareTarget;
use crate::state::{AppState, Focus, MainView};
use crate::utils::{clip_to_width, run_command};
use crate::view::{Line, Tone, detail_view, list_view, visible_cards};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use futures::StreamExt;
use std::io::{self, Write};
use tracing::{debug, error, info, instrument};

/// Rows used by the search bar and its separator.
const HEADER_ROWS: u16 = 2;
/// Row used by the hint/notice line.
const FOOTER_ROWS: u16 = 1;

enum Control {
    Continue,
    Quit,
}

/// Transient line shown in the footer, e.g. a share link.
#[derive(Debug, Default)]
struct Ui {
    notice: Option<String>,
}

/// Take over the terminal, mount the shell and run until the user quits.
///
/// The terminal is restored on every exit path.
#[instrument(level = "info", skip_all)]
pub async fn run<S: ArticleSearch>(mut shell: Shell<S>, open_command: Vec<String>) -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut shell, &open_command, &mut stdout).await;

    let restore = execute!(stdout, Show, LeaveAlternateScreen);
    terminal::disable_raw_mode()?;
    restore?;
    info!("Terminal restored");
    result
}

async fn event_loop<S: ArticleSearch, W: Write>(
    shell: &mut Shell<S>,
    open_command: &[String],
    out: &mut W,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut ui = Ui::default();
    shell.mount();

    loop {
        let (cols, rows) = terminal::size()?;
        draw(out, shell, &ui, cols, rows)?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Control::Quit = on_key(shell, &mut ui, key, open_command) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "Terminal input failed");
                    return Err(e);
                }
                None => break,
            },
            event = shell.next_event() => shell.handle(event),
        }
    }
    Ok(())
}

fn on_key<S: ArticleSearch>(
    shell: &mut Shell<S>,
    ui: &mut Ui,
    key: KeyEvent,
    open_command: &[String],
) -> Control {
    ui.notice = None;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return Control::Quit,
        KeyCode::Char('r') if ctrl => {
            shell.submit_search();
            return Control::Continue;
        }
        _ => {}
    }

    if shell.state().detail_open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Left => shell.close_detail(),
            KeyCode::Char('o') => open_link(open_command, &shell.state().selected.url),
            KeyCode::Char('s') => shell.speak_selected(),
            _ => {}
        }
        return Control::Continue;
    }

    match shell.state().focus {
        Focus::Search => match key.code {
            KeyCode::Enter => shell.submit_and_blur(),
            KeyCode::Backspace => {
                let mut query = shell.state().query.clone();
                query.pop();
                shell.set_query(query);
            }
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => shell.focus(Focus::List),
            KeyCode::Char(c) if !ctrl => {
                let mut query = shell.state().query.clone();
                query.push(c);
                shell.set_query(query);
            }
            _ => {}
        },
        Focus::List => match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Up | KeyCode::Char('k') => shell.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => shell.move_cursor(1),
            KeyCode::Enter => {
                if shell.state().current_article().is_some() {
                    let cursor = shell.state().cursor;
                    shell.select_article(cursor);
                }
            }
            KeyCode::Char('s') => shell.speak_lead(),
            KeyCode::Char('h') => shell.speak_headlines(),
            KeyCode::Char('/') | KeyCode::Tab => shell.focus(Focus::Search),
            KeyCode::Char(c) => {
                if let (Some(target), Some(article)) =
                    (ShareTarget::from_key(c), shell.state().current_article())
                {
                    let link = target.link(article);
                    debug!(%target, %link, "Share link requested");
                    ui.notice = Some(format!("{}: {}", target, link));
                }
            }
            _ => {}
        },
    }
    Control::Continue
}

/// Hand `url` to the configured opener in the background.
fn open_link(command: &[String], url: &str) {
    let Some((program, args)) = command.split_first() else {
        return;
    };
    if url.is_empty() {
        return;
    }
    let program = program.clone();
    let args = args.to_vec();
    let url = url.to_string();
    tokio::spawn(async move {
        match run_command(&program, &args, &url).await {
            Ok(code) => debug!(%url, ?code, "Opened link"),
            Err(e) => error!(%url, error = %e, "Failed to open link"),
        }
    });
}

fn draw<S: ArticleSearch, W: Write>(
    out: &mut W,
    shell: &mut Shell<S>,
    ui: &Ui,
    cols: u16,
    rows: u16,
) -> io::Result<()> {
    let width = cols as usize;
    let searching = shell.in_flight() > 0 || shell.debounce_armed();
    let state = shell.state_mut();

    queue!(out, Clear(ClearType::All))?;

    let caret = if state.focus == Focus::Search && !state.detail_open { "▏" } else { "" };
    let status = if searching { "  searching…" } else { "" };
    put(out, 0, &format!("Search: {}{}{}", state.query, caret, status), Tone::Heading, width)?;
    put(out, 1, &"─".repeat(width), Tone::Hint, width)?;

    let body_rows = rows.saturating_sub(HEADER_ROWS + FOOTER_ROWS) as usize;
    if state.detail_open {
        draw_lines(out, &detail_view(&state.selected).lines(width), body_rows, width)?;
    } else {
        draw_main(out, state, body_rows, width)?;
    }

    let footer = match &ui.notice {
        Some(notice) => notice.clone(),
        None if state.detail_open => "[o] open link  [s] speak lead  [Esc] close".to_string(),
        None => match state.focus {
            Focus::Search => "[Enter] search  [Tab] list  [Ctrl+C] quit".to_string(),
            Focus::List => {
                "[Enter] open  [s] speak lead  [h] speak headlines  [1-7] share  [/] search  [q] quit"
                    .to_string()
            }
        },
    };
    put(out, rows.saturating_sub(1), &footer, Tone::Hint, width)?;
    out.flush()
}

fn draw_main<W: Write>(out: &mut W, state: &mut AppState, body_rows: usize, width: usize) -> io::Result<()> {
    let articles = match state.main_view() {
        MainView::Unavailable => {
            return put(out, HEADER_ROWS, UNAVAILABLE_MESSAGE, Tone::Plain, width);
        }
        MainView::Articles(articles) => articles,
    };

    let list = list_view(articles);
    let mut row = HEADER_ROWS as usize;
    let mut available = body_rows;
    if let Some(heading) = list.heading {
        put(out, row as u16, heading, Tone::Heading, width)?;
        row += 2;
        available = available.saturating_sub(2);
    }

    let card_width = width.saturating_sub(2).max(1);
    let rendered: Vec<Vec<Line>> = list.cards.iter().map(|c| c.lines(card_width)).collect();
    let heights: Vec<usize> = rendered.iter().map(Vec::len).collect();

    state.keep_cursor_visible(usize::MAX);
    while state.scroll < state.cursor
        && state.cursor >= state.scroll + visible_cards(&heights, state.scroll, available)
    {
        state.scroll += 1;
    }

    let last_row = row + available;
    for (index, lines) in rendered.iter().enumerate().skip(state.scroll) {
        if row >= last_row {
            break;
        }
        let marker = if index == state.cursor && state.focus == Focus::List { "> " } else { "  " };
        for line in lines {
            if row >= last_row {
                break;
            }
            put(out, row as u16, &format!("{}{}", marker, line.text), line.tone, width)?;
            row += 1;
        }
        row += 1;
    }
    Ok(())
}

fn draw_lines<W: Write>(out: &mut W, lines: &[Line], body_rows: usize, width: usize) -> io::Result<()> {
    for (offset, line) in lines.iter().take(body_rows).enumerate() {
        put(out, HEADER_ROWS + offset as u16, &line.text, line.tone, width)?;
    }
    Ok(())
}

fn put<W: Write>(out: &mut W, row: u16, text: &str, tone: Tone, width: usize) -> io::Result<()> {
    let clipped = clip_to_width(text, width);
    queue!(out, MoveTo(0, row))?;
    match tone {
        Tone::Heading | Tone::Headline => queue!(out, SetAttribute(Attribute::Bold))?,
        Tone::Byline | Tone::Hint => queue!(out, SetAttribute(Attribute::Dim))?,
        Tone::Link => queue!(out, SetAttribute(Attribute::Underlined))?,
        Tone::Plain => {}
    }
    queue!(out, Print(clipped), SetAttribute(Attribute::Reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{ScriptedSearch, article, pump};
    use crate::speech::testing::RecordingSynthesizer;
    use std::sync::Arc;
    use std::time::Duration;

    const WINDOW: Duration = Duration::from_millis(500);

    fn shell(backend: ScriptedSearch) -> (Shell<ScriptedSearch>, RecordingSynthesizer) {
        let synth = RecordingSynthesizer::default();
        let shell = Shell::new("crypto", Arc::new(backend), Arc::new(synth.clone()), WINDOW);
        (shell, synth)
    }

    fn press(shell: &mut Shell<ScriptedSearch>, ui: &mut Ui, code: KeyCode) -> Control {
        on_key(shell, ui, KeyEvent::new(code, KeyModifiers::NONE), &[])
    }

    fn ctrl(shell: &mut Shell<ScriptedSearch>, ui: &mut Ui, c: char) -> Control {
        on_key(shell, ui, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), &[])
    }

    async fn loaded() -> (Shell<ScriptedSearch>, RecordingSynthesizer) {
        let (mut shell, synth) = shell(
            ScriptedSearch::default()
                .answer("crypto", 0, Ok(vec![article("a"), article("b")]))
                .answer("down", 0, Err(503)),
        );
        shell.mount();
        pump(&mut shell).await;
        (shell, synth)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_edits_query_without_searching() {
        let (mut shell, _) = shell(ScriptedSearch::default());
        let mut ui = Ui::default();

        press(&mut shell, &mut ui, KeyCode::Backspace);
        press(&mut shell, &mut ui, KeyCode::Char('!'));
        assert_eq!(shell.state().query, "crypt!");
        assert!(!shell.debounce_armed());
        assert_eq!(shell.state().focus, Focus::Search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_in_search_box_submits_and_blurs() {
        let (mut shell, _) = shell(ScriptedSearch::default());
        let mut ui = Ui::default();

        assert!(matches!(press(&mut shell, &mut ui, KeyCode::Enter), Control::Continue));
        assert!(shell.debounce_armed());
        assert_eq!(shell.state().focus, Focus::List);
        assert!(!shell.state().detail_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_r_searches_from_any_focus() {
        let (mut shell, _) = shell(ScriptedSearch::default());
        let mut ui = Ui::default();
        shell.focus(Focus::List);

        ctrl(&mut shell, &mut ui, 'r');
        assert!(shell.debounce_armed());
        assert_eq!(shell.state().focus, Focus::List);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_opens_detail_and_esc_keeps_selection() {
        let (mut shell, _) = loaded().await;
        let mut ui = Ui::default();
        shell.focus(Focus::List);

        press(&mut shell, &mut ui, KeyCode::Down);
        press(&mut shell, &mut ui, KeyCode::Enter);
        assert!(shell.state().detail_open);
        assert_eq!(shell.state().selected.headline_text(), "b");

        press(&mut shell, &mut ui, KeyCode::Esc);
        assert!(!shell.state().detail_open);
        assert_eq!(shell.state().selected.headline_text(), "b");

        press(&mut shell, &mut ui, KeyCode::Enter);
        assert!(matches!(press(&mut shell, &mut ui, KeyCode::Char('q')), Control::Continue));
        assert!(!shell.state().detail_open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_does_nothing_while_unavailable() {
        let (mut shell, _) = loaded().await;
        let mut ui = Ui::default();
        shell.set_query("down");
        press(&mut shell, &mut ui, KeyCode::Enter);
        pump(&mut shell).await;
        pump(&mut shell).await;
        assert_eq!(shell.state().main_view(), MainView::Unavailable);

        press(&mut shell, &mut ui, KeyCode::Enter);
        assert!(!shell.state().detail_open);
        assert!(ui.notice.is_none());
        press(&mut shell, &mut ui, KeyCode::Char('1'));
        assert!(ui.notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_digit_shows_share_link_until_next_key() {
        let (mut shell, _) = loaded().await;
        let mut ui = Ui::default();
        shell.focus(Focus::List);

        press(&mut shell, &mut ui, KeyCode::Char('2'));
        let notice = ui.notice.clone().unwrap();
        assert!(notice.starts_with("Facebook: https://www.facebook.com/sharer/sharer.php?u="));
        assert!(notice.contains("https%3A%2F%2Fexample.com%2Fa"));

        press(&mut shell, &mut ui, KeyCode::Char('8'));
        assert!(ui.notice.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_speaks_open_article_after_results_change() {
        let (mut shell, synth) = loaded().await;
        let mut ui = Ui::default();
        shell.focus(Focus::List);

        press(&mut shell, &mut ui, KeyCode::Down);
        press(&mut shell, &mut ui, KeyCode::Enter);
        ctrl(&mut shell, &mut ui, 'r');
        pump(&mut shell).await; // fired
        pump(&mut shell).await; // settled; cursor reset
        assert_eq!(shell.state().cursor, 0);
        assert!(shell.state().detail_open);

        press(&mut shell, &mut ui, KeyCode::Char('s'));
        assert_eq!(synth.spoken(), vec!["Lead of b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_speech_keys() {
        let (mut shell, synth) = loaded().await;
        let mut ui = Ui::default();
        shell.focus(Focus::List);

        press(&mut shell, &mut ui, KeyCode::Char('s'));
        press(&mut shell, &mut ui, KeyCode::Char('h'));
        assert_eq!(synth.spoken(), vec!["Lead of a", "a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_keys() {
        let (mut shell, _) = shell(ScriptedSearch::default());
        let mut ui = Ui::default();

        assert!(matches!(press(&mut shell, &mut ui, KeyCode::Char('q')), Control::Continue));
        assert_eq!(shell.state().query, "cryptoq");

        assert!(matches!(ctrl(&mut shell, &mut ui, 'c'), Control::Quit));

        press(&mut shell, &mut ui, KeyCode::Tab);
        assert_eq!(shell.state().focus, Focus::List);
        assert!(matches!(press(&mut shell, &mut ui, KeyCode::Char('q')), Control::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slash_returns_to_search_box() {
        let (mut shell, _) = shell(ScriptedSearch::default());
        let mut ui = Ui::default();
        shell.focus(Focus::List);
        press(&mut shell, &mut ui, KeyCode::Char('/'));
        assert_eq!(shell.state().focus, Focus::Search);
    }
}
