//! View-models for the article list and the detail panel.
//!
//! These are pure functions of the records they are given. They decide what
//! is shown (which lines, which links, which optional pieces are omitted) and
//! leave drawing to the terminal front end.

use crate::models::Article;
use crate::share::{ShareLink, share_row};
use crate::utils::wrap_text;
use itertools::Itertools;

pub const RESULTS_HEADING: &str = "Search Results";
pub const CONTINUE_READING: &str = "Continue Reading Original Article >";

/// How a rendered line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Headline,
    Byline,
    Plain,
    Link,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Summary card for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    /// Position in the result list; the only identity a record has.
    pub index: usize,
    pub headline: String,
    /// Empty when the record has no byline.
    pub byline: String,
    pub image: Option<String>,
    pub published: String,
    pub shares: Vec<ShareLink>,
}

impl ArticleCard {
    pub fn new(index: usize, article: &Article) -> Self {
        Self {
            index,
            headline: article.headline_text().to_string(),
            byline: article.byline_text().to_string(),
            image: article.image_url(),
            published: article.published_on(),
            shares: share_row(article),
        }
    }

    /// Lines of this card wrapped to `width`.
    pub fn lines(&self, width: usize) -> Vec<Line> {
        let mut lines: Vec<Line> = wrap_text(&self.headline, width)
            .into_iter()
            .map(|text| Line::new(text, Tone::Headline))
            .collect();
        if lines.is_empty() {
            lines.push(Line::new("", Tone::Headline));
        }

        lines.push(Line::new(self.byline.clone(), Tone::Byline));
        if let Some(image) = &self.image {
            lines.push(Line::new(format!("[image] {}", image), Tone::Link));
        }
        if !self.published.is_empty() {
            lines.push(Line::new(self.published.clone(), Tone::Hint));
        }

        let share_row = self
            .shares
            .iter()
            .enumerate()
            .map(|(i, link)| format!("{} {}", i + 1, link.target))
            .join("  ");
        lines.push(Line::new(format!("[s] speak lead  {}", share_row), Tone::Hint));
        lines
    }
}

/// The list of cards plus its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Present only when there is at least one card.
    pub heading: Option<&'static str>,
    pub cards: Vec<ArticleCard>,
}

/// Build the card list for `articles`, keeping their order.
pub fn list_view(articles: &[Article]) -> ListView {
    ListView {
        heading: (!articles.is_empty()).then_some(RESULTS_HEADING),
        cards: articles
            .iter()
            .enumerate()
            .map(|(i, a)| ArticleCard::new(i, a))
            .collect(),
    }
}

/// Content of the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub headline: String,
    pub lead_paragraph: String,
    /// Absolute link to the original article.
    pub link: String,
}

pub fn detail_view(article: &Article) -> DetailView {
    DetailView {
        headline: article.headline_text().to_string(),
        lead_paragraph: article.lead_paragraph.clone(),
        link: article.url.clone(),
    }
}

impl DetailView {
    pub fn lines(&self, width: usize) -> Vec<Line> {
        let mut lines = Vec::new();
        lines.extend(
            wrap_text(&self.headline, width)
                .into_iter()
                .map(|text| Line::new(text, Tone::Headline)),
        );
        lines.push(Line::new("", Tone::Plain));
        lines.extend(
            wrap_text(&self.lead_paragraph, width)
                .into_iter()
                .map(|text| Line::new(text, Tone::Plain)),
        );
        lines.push(Line::new("", Tone::Plain));
        lines.push(Line::new(CONTINUE_READING, Tone::Heading));
        lines.push(Line::new(self.link.clone(), Tone::Link));
        lines.push(Line::new("", Tone::Plain));
        lines.push(Line::new("[o] open link  [Esc] close", Tone::Hint));
        lines
    }
}

/// Number of cards, starting at `first`, that fit completely in `available` rows.
///
/// # Arguments
///
/// * `heights` - Rendered line count of every card, in list order
/// * `first` - Index of the first card on screen
/// * `available` - Rows left for cards; cards are separated by one blank row
///
/// # Returns
///
/// How many cards fit. At least one is reported whenever a card exists at
/// `first`, so an oversized card still gets drawn.
pub fn visible_cards(heights: &[usize], first: usize, available: usize) -> usize {
    let mut used = 0usize;
    let mut count = 0usize;
    for height in heights.iter().skip(first) {
        let needed = if count == 0 { *height } else { height + 1 };
        if used + needed > available && count > 0 {
            break;
        }
        used += needed;
        count += 1;
    }
    count
}
