//! Data models for archive search results.
//!
//! This module defines two families of types:
//! - The upstream wire format of the article search API ([`SearchEnvelope`],
//!   [`SearchResponse`], [`RawDoc`] and its nested pieces). These mirror the
//!   JSON exactly and tolerate missing fields.
//! - The normalized [`Article`] record the rest of the application works with.
//!
//! Normalization happens in one place, `From<RawDoc> for Article`, so every
//! consumer sees the same shape regardless of which optional fields the API
//! chose to send.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Base URL that relative multimedia paths are resolved against.
pub const MEDIA_BASE_URL: &str = "https://www.nytimes.com/";

/// Media attached to an article, taken from the first upstream multimedia entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Multimedia {
    /// Media type as reported upstream (e.g. `"image"`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Path relative to [`MEDIA_BASE_URL`].
    pub url: Option<String>,
}

/// A normalized search result.
///
/// Records have no identity beyond their position in the result list. Every
/// successful search produces a fresh `Vec<Article>` that replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    /// Publication that carried the story (e.g. "The New York Times").
    pub source: String,
    /// Author line such as "By Jane Doe". Absent upstream for many wire stories.
    pub byline: Option<String>,
    /// Main headline.
    pub headline: Option<String>,
    /// Short summary.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Absolute link to the original article.
    pub url: String,
    /// First paragraph of the story.
    pub lead_paragraph: String,
    /// Publication timestamp exactly as sent upstream.
    pub pub_date: String,
    pub multimedia: Multimedia,
}

impl Article {
    /// The all-empty record used before any article has been opened.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Headline or the empty string.
    pub fn headline_text(&self) -> &str {
        self.headline.as_deref().unwrap_or("")
    }

    /// Byline or the empty string.
    pub fn byline_text(&self) -> &str {
        self.byline.as_deref().unwrap_or("")
    }

    /// Absolute image URL, if the record carries a non-empty media path.
    pub fn image_url(&self) -> Option<String> {
        self.multimedia
            .url
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", MEDIA_BASE_URL, path.trim_start_matches('/')))
    }

    /// Parse `pub_date` for display.
    ///
    /// The API sends `2024-03-01T12:00:05+0000`; RFC 3339 is accepted as well.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(&self.pub_date, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(&self.pub_date))
            .ok()
    }

    /// Human readable publication date, falling back to the raw string.
    pub fn published_on(&self) -> String {
        match self.published_at() {
            Some(dt) => dt.format("%b %-d, %Y").to_string(),
            None => self.pub_date.clone(),
        }
    }
}

/// Top-level JSON object returned by the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    pub status: Option<String>,
    pub response: Option<SearchResponse>,
}

impl SearchEnvelope {
    /// Normalized articles, or `None` when the envelope carries no `response.docs`.
    pub fn into_articles(self) -> Option<Vec<Article>> {
        self.response
            .and_then(|r| r.docs)
            .map(|docs| docs.into_iter().map(Article::from).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    pub docs: Option<Vec<RawDoc>>,
}

/// One upstream document. Every field is optional on the wire.
///
/// A field with an unexpected shape (`"byline": []`, a number where a string
/// belongs, ...) decodes as `None` instead of failing the whole envelope.
#[derive(Debug, Default, Deserialize)]
pub struct RawDoc {
    #[serde(rename = "abstract", default, deserialize_with = "lenient")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub lead_paragraph: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub byline: Option<RawByline>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub headline: Option<RawHeadline>,
    /// Documented as an array; anything else is treated as "no media".
    pub multimedia: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub web_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub pub_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawByline {
    #[serde(default, deserialize_with = "lenient")]
    pub original: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHeadline {
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<String>,
}

/// Decode `T`, mapping any value of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], but only JSON objects are accepted. Without this an
/// array such as `["By Jane Doe"]` would decode positionally into a struct.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .filter(serde_json::Value::is_object)
        .and_then(|v| serde_json::from_value(v).ok()))
}

impl RawDoc {
    /// First multimedia entry, if the field is a non-empty array of objects.
    pub fn first_media(&self) -> RawMultimedia {
        self.multimedia
            .as_ref()
            .and_then(|value| value.as_array())
            .and_then(|entries| entries.first())
            .filter(|entry| entry.is_object())
            .and_then(|entry| serde_json::from_value(entry.clone()).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawMultimedia {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

impl From<RawDoc> for Article {
    fn from(doc: RawDoc) -> Self {
        let first_media = doc.first_media();
        Article {
            source: doc.source.unwrap_or_default(),
            byline: doc.byline.and_then(|b| b.original),
            headline: doc.headline.and_then(|h| h.main),
            abstract_text: doc.abstract_text.unwrap_or_default(),
            url: doc.web_url.unwrap_or_default(),
            lead_paragraph: doc.lead_paragraph.unwrap_or_default(),
            pub_date: doc.pub_date.unwrap_or_default(),
            multimedia: Multimedia {
                kind: first_media.kind,
                url: first_media.url,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOC: &str = r#"{
        "abstract": "Bitcoin climbed again.",
        "lead_paragraph": "The price of Bitcoin rose on Tuesday.",
        "source": "The New York Times",
        "byline": { "original": "By Jane Doe", "person": [] },
        "headline": { "main": "Bitcoin Rallies", "kicker": null },
        "multimedia": [
            { "type": "image", "url": "images/2024/03/01/bitcoin.jpg" },
            { "type": "image", "url": "images/2024/03/01/other.jpg" }
        ],
        "web_url": "https://www.nytimes.com/2024/03/01/business/bitcoin.html",
        "pub_date": "2024-03-01T12:00:05+0000"
    }"#;

    #[test]
    fn test_full_doc_normalization() {
        let doc: RawDoc = serde_json::from_str(FULL_DOC).unwrap();
        let article = Article::from(doc);

        assert_eq!(article.headline.as_deref(), Some("Bitcoin Rallies"));
        assert_eq!(article.byline.as_deref(), Some("By Jane Doe"));
        assert_eq!(article.abstract_text, "Bitcoin climbed again.");
        assert_eq!(article.source, "The New York Times");
        assert_eq!(
            article.url,
            "https://www.nytimes.com/2024/03/01/business/bitcoin.html"
        );
        assert_eq!(article.pub_date, "2024-03-01T12:00:05+0000");
        assert_eq!(article.multimedia.kind.as_deref(), Some("image"));
        assert_eq!(
            article.multimedia.url.as_deref(),
            Some("images/2024/03/01/bitcoin.jpg")
        );
    }

    #[test]
    fn test_missing_optional_fields_normalize_to_none() {
        let doc: RawDoc = serde_json::from_str(
            r#"{ "lead_paragraph": "Wire copy.", "web_url": "https://example.com/a", "multimedia": [] }"#,
        )
        .unwrap();
        let article = Article::from(doc);

        assert_eq!(article.byline, None);
        assert_eq!(article.headline, None);
        assert_eq!(article.multimedia, Multimedia::default());
        assert_eq!(article.byline_text(), "");
        assert_eq!(article.headline_text(), "");
        assert_eq!(article.image_url(), None);
        assert_eq!(article.source, "");
    }

    #[test]
    fn test_non_array_multimedia_is_tolerated() {
        let doc: RawDoc =
            serde_json::from_str(r#"{ "multimedia": { "default": { "url": "x.jpg" } } }"#).unwrap();
        assert_eq!(Article::from(doc).multimedia, Multimedia::default());

        let doc: RawDoc = serde_json::from_str(r#"{ "multimedia": null }"#).unwrap();
        assert_eq!(Article::from(doc).multimedia, Multimedia::default());
    }

    #[test]
    fn test_byline_object_without_original() {
        let doc: RawDoc =
            serde_json::from_str(r#"{ "byline": {}, "headline": { "print_headline": "x" } }"#)
                .unwrap();
        let article = Article::from(doc);
        assert_eq!(article.byline, None);
        assert_eq!(article.headline, None);
    }

    #[test]
    fn test_wrong_shaped_byline_and_headline_are_dropped() {
        for (byline, headline) in [
            ("[]", "[]"),
            (r#""By Jane Doe""#, r#""Bitcoin Rallies""#),
            (r#"["By Jane Doe"]"#, r#"["Bitcoin Rallies"]"#),
            ("42", "true"),
        ] {
            let json = format!(
                r#"{{ "byline": {}, "headline": {}, "lead_paragraph": "Kept." }}"#,
                byline, headline
            );
            let article = Article::from(serde_json::from_str::<RawDoc>(&json).unwrap());
            assert_eq!(article.byline, None, "byline {}", byline);
            assert_eq!(article.headline, None, "headline {}", headline);
            assert_eq!(article.lead_paragraph, "Kept.");
        }
    }

    #[test]
    fn test_wrong_shaped_strings_become_empty() {
        let doc: RawDoc = serde_json::from_str(
            r#"{ "abstract": 7, "pub_date": null, "web_url": ["x"], "byline": { "original": 3 },
                 "multimedia": [["images/a.jpg"]] }"#,
        )
        .unwrap();
        let article = Article::from(doc);
        assert_eq!(article.abstract_text, "");
        assert_eq!(article.pub_date, "");
        assert_eq!(article.url, "");
        assert_eq!(article.byline, None);
        assert_eq!(article.multimedia, Multimedia::default());
    }

    #[test]
    fn test_one_malformed_doc_does_not_reject_envelope() {
        let json = format!(
            r#"{{ "status": "OK", "response": {{ "docs": [{}, {{ "byline": [], "headline": {{ "main": "Second" }} }}] }} }}"#,
            FULL_DOC
        );
        let articles = serde_json::from_str::<SearchEnvelope>(&json)
            .unwrap()
            .into_articles()
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].byline_text(), "By Jane Doe");
        assert_eq!(articles[1].byline, None);
        assert_eq!(articles[1].headline_text(), "Second");
    }

    #[test]
    fn test_envelope_without_docs() {
        let envelope: SearchEnvelope = serde_json::from_str(r#"{ "status": "OK" }"#).unwrap();
        assert!(envelope.into_articles().is_none());

        let envelope: SearchEnvelope =
            serde_json::from_str(r#"{ "status": "OK", "response": { "meta": {} } }"#).unwrap();
        assert!(envelope.into_articles().is_none());
    }

    #[test]
    fn test_envelope_keeps_upstream_order() {
        let json = format!(
            r#"{{ "status": "OK", "response": {{ "docs": [{}, {{ "headline": {{ "main": "Second" }} }}] }} }}"#,
            FULL_DOC
        );
        let envelope: SearchEnvelope = serde_json::from_str(&json).unwrap();
        let articles = envelope.into_articles().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].headline_text(), "Bitcoin Rallies");
        assert_eq!(articles[1].headline_text(), "Second");
    }

    #[test]
    fn test_image_url_resolves_relative_path() {
        let mut article = Article::placeholder();
        article.multimedia.url = Some("images/a.jpg".to_string());
        assert_eq!(
            article.image_url().as_deref(),
            Some("https://www.nytimes.com/images/a.jpg")
        );

        article.multimedia.url = Some(String::new());
        assert_eq!(article.image_url(), None);
    }

    #[test]
    fn test_published_on() {
        let mut article = Article::placeholder();
        article.pub_date = "2024-03-01T12:00:05+0000".to_string();
        assert_eq!(article.published_on(), "Mar 1, 2024");

        article.pub_date = "2024-03-09T08:00:00Z".to_string();
        assert_eq!(article.published_on(), "Mar 9, 2024");

        article.pub_date = "yesterday".to_string();
        assert_eq!(article.published_on(), "yesterday");
    }

    #[test]
    fn test_article_serializes_with_upstream_names() {
        let mut article = Article::placeholder();
        article.abstract_text = "Summary".to_string();
        article.multimedia.kind = Some("image".to_string());

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["abstract"], "Summary");
        assert_eq!(json["multimedia"]["type"], "image");
    }

    #[test]
    fn test_placeholder_is_empty() {
        let article = Article::placeholder();
        assert_eq!(article.lead_paragraph, "");
        assert_eq!(article.url, "");
        assert_eq!(article.headline_text(), "");
    }
}
