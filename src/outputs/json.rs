//! JSON output of mapped records.
//!
//! The records are written exactly as the list holds them, using the field
//! names of [`Article`]'s serde representation (`abstract`, `pub_date`,
//! `multimedia.type`, ...).

use crate::models::Article;
use std::error::Error;
use std::io::Write;
use tracing::{info, instrument};

/// Serialize `articles` as a pretty JSON array followed by a newline.
#[instrument(level = "info", skip_all, fields(count = articles.len()))]
pub fn write_articles<W: Write>(articles: &[Article], out: &mut W) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *out, articles)?;
    writeln!(out)?;
    out.flush()?;
    info!("Wrote JSON results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Multimedia;

    #[test]
    fn test_write_articles_uses_record_field_names() {
        let articles = vec![Article {
            source: "The New York Times".to_string(),
            abstract_text: "Short".to_string(),
            url: "https://example.com/a".to_string(),
            pub_date: "2024-03-01T12:00:00+0000".to_string(),
            multimedia: Multimedia {
                kind: Some("image".to_string()),
                url: Some("images/a.jpg".to_string()),
            },
            ..Article::placeholder()
        }];

        let mut buf = Vec::new();
        write_articles(&articles, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value[0]["abstract"], "Short");
        assert_eq!(value[0]["pub_date"], "2024-03-01T12:00:00+0000");
        assert_eq!(value[0]["multimedia"]["type"], "image");
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_write_empty_list() {
        let mut buf = Vec::new();
        write_articles(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }
}
