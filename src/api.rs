//! Article search API client.
//!
//! # Architecture
//!
//! - [`ArticleSearch`]: trait the application shell depends on. It is the
//!   seam where tests substitute a scripted backend.
//! - [`SearchClient`]: the HTTP implementation talking to the archive's
//!   article search endpoint.
//!
//! # Request contract
//!
//! ```text
//! GET <endpoint>?q=<query>&api-key=<key>
//! content-type: application/json
//! ```
//!
//! The response envelope is normalized with [`SearchEnvelope::into_articles`].
//! There is no retry and no timeout beyond the HTTP client defaults: a failed
//! request is final and surfaces as a [`SearchError`].

use crate::config::Settings;
use crate::error::SearchError;
use crate::models::{Article, SearchEnvelope};
use crate::utils::truncate_for_log;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::fmt;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Result of one search.
///
/// `Ok(None)` means there was nothing to apply: either no request was issued
/// (empty query) or the envelope carried no `response.docs`.
pub type SearchResult = Result<Option<Vec<Article>>, SearchError>;

/// Anything that can turn a query into articles.
pub trait ArticleSearch: Send + Sync + 'static {
    /// Run one search. Implementations must not issue a request for an empty query.
    fn search(&self, query: &str) -> impl Future<Output = SearchResult> + Send;
}

/// HTTP client for the article search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}

impl SearchClient {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.endpoint.clone(), settings.api_key.clone())
    }

    /// Full request URL for `query`. The query is passed through verbatim and
    /// only form-encoded.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("api-key", &self.api_key);
        url
    }

    #[instrument(level = "info", skip(self), fields(%query))]
    async fn fetch(&self, query: &str) -> SearchResult {
        if query.is_empty() {
            debug!("Empty query; not issuing a request");
            return Ok(None);
        }

        let t0 = Instant::now();
        let response = self
            .http
            .get(self.request_url(query))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Search endpoint returned an error status"
            );
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: SearchEnvelope = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(
                    error = %e,
                    body_preview = %truncate_for_log(&String::from_utf8_lossy(&body), 300),
                    "Search response is not the expected JSON envelope"
                );
                return Err(e.into());
            }
        };

        debug!(upstream_status = ?envelope.status, "Decoded search envelope");
        let articles = envelope.into_articles();
        match &articles {
            Some(list) => info!(
                count = list.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Search succeeded"
            ),
            None => warn!(
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Search response carried no documents"
            ),
        }
        Ok(articles)
    }
}

impl ArticleSearch for SearchClient {
    async fn search(&self, query: &str) -> SearchResult {
        let res = self.fetch(query).await;
        if let Err(e) = &res {
            error!(error = %e, "Search failed");
        }
        res
    }
}
