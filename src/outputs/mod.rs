//! Output for the one-shot `--print` mode.
//!
//! # Submodules
//!
//! - [`json`]: the mapped records as pretty-printed JSON
//! - [`text`]: the same cards the terminal UI draws, as plain text

pub mod json;
pub mod text;

use crate::api::ArticleSearch;
use std::error::Error;
use std::io::Write;
use tracing::{info, instrument};

/// How `--print` renders the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// What a `--print` run ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// The list (possibly empty) was written.
    Printed { count: usize },
    /// The search failed and the unavailability notice was written.
    Unavailable,
}

/// Run one search and write the outcome.
///
/// # Arguments
///
/// * `backend` - Search backend
/// * `query` - Query to search; an empty query prints an empty list
/// * `format` - Rendering of the result list
/// * `out` - Receives the result list
/// * `err` - Receives the unavailability notice
///
/// # Returns
///
/// The [`PrintOutcome`]; failing to write is the only error.
#[instrument(level = "info", skip(backend, out, err))]
pub async fn print_search<S, W, E>(
    backend: &S,
    query: &str,
    format: Format,
    out: &mut W,
    err: &mut E,
) -> Result<PrintOutcome, Box<dyn Error>>
where
    S: ArticleSearch,
    W: Write,
    E: Write,
{
    let articles = match backend.search(query).await {
        Ok(articles) => articles.unwrap_or_default(),
        Err(_) => {
            text::write_unavailable(err)?;
            return Ok(PrintOutcome::Unavailable);
        }
    };

    match format {
        Format::Json => json::write_articles(&articles, out)?,
        Format::Text => text::write_articles(&articles, text::PRINT_WIDTH, out)?,
    }
    info!(count = articles.len(), "Printed search results");
    Ok(PrintOutcome::Printed {
        count: articles.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{ScriptedSearch, article};

    #[tokio::test]
    async fn test_print_search_text() {
        let backend = ScriptedSearch::default().answer("crypto", 0, Ok(vec![article("a"), article("b")]));
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let outcome = print_search(&backend, "crypto", Format::Text, &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(outcome, PrintOutcome::Printed { count: 2 });
        assert!(String::from_utf8(out).unwrap().starts_with("Search Results\n"));
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_print_search_failure_reports_unavailable() {
        let backend = ScriptedSearch::default().answer("crypto", 0, Err(500));
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let outcome = print_search(&backend, "crypto", Format::Json, &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(outcome, PrintOutcome::Unavailable);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Service is not available. Please try again later.\n"
        );
    }

    #[tokio::test]
    async fn test_print_search_empty_query_prints_empty_json() {
        let backend = ScriptedSearch::default();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let outcome = print_search(&backend, "", Format::Json, &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(outcome, PrintOutcome::Printed { count: 0 });
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
        assert!(backend.calls().is_empty());
    }
}
