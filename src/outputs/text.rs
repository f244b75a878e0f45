//! Plain-text output of the article list.
//!
//! Uses the same [`list_view`] cards the terminal UI draws, followed by the
//! full share links for each card.

use crate::error::UNAVAILABLE_MESSAGE;
use crate::models::Article;
use crate::view::list_view;
use std::io::{self, Write};

/// Default wrap width for printed cards.
pub const PRINT_WIDTH: usize = 80;

/// Write the heading and one block per card.
pub fn write_articles<W: Write>(articles: &[Article], width: usize, out: &mut W) -> io::Result<()> {
    let list = list_view(articles);
    let Some(heading) = list.heading else {
        writeln!(out, "No results.")?;
        return out.flush();
    };

    writeln!(out, "{}", heading)?;
    writeln!(out)?;
    for card in &list.cards {
        for line in card.lines(width) {
            writeln!(out, "{}", line.text)?;
        }
        for share in &card.shares {
            writeln!(out, "  {}: {}", share.target, share.href)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

pub fn write_unavailable<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", UNAVAILABLE_MESSAGE)?;
    out.flush()
}
