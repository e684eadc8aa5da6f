// src/checker/search.rs
// =============================================================================
// This module runs ONE search query and turns the response into an outcome.
//
// Key functionality:
// - Builds the search request (query text, locale and country hints)
// - Sends it through a SearchTransport (real HTTP, or a fake in tests)
// - Classifies the page (see classify.rs)
// - Sleeps a fixed delay after EVERY query, success or failure, so the
//   search engine is never hit faster than once per delay
//
// Failures never escape this module: a timeout, a refused connection or an
// HTTP error all become SearchOutcome::Blocked with the reason attached.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::classify::Classifier;
use super::normalize::UrlForms;
use crate::config::CheckerConfig;

// Why a query did not produce a usable answer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SearchError {
    #[error("rate limited")]
    RateLimited,
    #[error("anti-bot challenge")]
    AntiBotChallenge,
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("connection error")]
    Connection,
    #[error("timed out")]
    Timeout,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

// Classification of one query attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A citation on the page contains the target URL
    Indexed,
    /// The page says "no results", or no citation matched
    NotFound,
    /// The engine did not answer usefully
    Blocked(SearchError),
}

// The raw answer of the search engine
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub status: u16,
    pub body: String,
}

// Sends a query and hands back the raw page
//
// The checker only depends on this trait, which keeps the two-phase logic
// testable without a network.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<SearchPage, SearchError>;
}

// The real transport: one reqwest Client reused for every query
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    locale: String,
    country: Option<String>,
}

impl HttpTransport {
    // rustls offers both h2 and http/1.1 over ALPN, so the search engine can
    // answer over HTTP/2 like a regular browser.
    pub fn new(config: &CheckerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .default_headers(default_headers(config)?)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            locale: config.locale.clone(),
            country: config.country.clone(),
        })
    }

    // Builds the GET request without sending it
    fn request(&self, query: &str) -> reqwest::RequestBuilder {
        let mut params = vec![("q", query), ("hl", self.locale.as_str())];
        if let Some(country) = &self.country {
            params.push(("cr", country.as_str()));
        }
        self.client.get(&self.endpoint).query(&params)
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn fetch(&self, query: &str) -> Result<SearchPage, SearchError> {
        let response = self.request(query).send().await.map_err(categorize_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(categorize_error)?;
        Ok(SearchPage { status, body })
    }
}

// Browser-like headers sent with every request
//
// Accept-Encoding is left to reqwest: setting it by hand would turn off
// its automatic gzip/brotli decoding.
fn default_headers(config: &CheckerConfig) -> anyhow::Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);
    Ok(headers)
}

// Maps reqwest failures onto our taxonomy
fn categorize_error(error: reqwest::Error) -> SearchError {
    if error.is_timeout() {
        SearchError::Timeout
    } else if error.is_connect() {
        SearchError::Connection
    } else {
        SearchError::Unexpected(error.to_string())
    }
}

// The two query shapes used by the checker
pub fn site_query(url: &str) -> String {
    format!("site:{}", url)
}

pub fn exact_phrase_query(url: &str) -> String {
    format!("\"{}\"", url)
}

// Runs one query for one target URL and classifies the answer
//
// Always waits `config.delay()` before returning.
pub async fn run_query<T: SearchTransport + ?Sized>(
    transport: &T,
    config: &CheckerConfig,
    query: &str,
    target_url: &str,
) -> SearchOutcome {
    debug!(query, "sending search query");

    let outcome = match transport.fetch(query).await {
        Ok(page) => {
            let classifier = Classifier {
                rules: &config.rules,
                rate_limit_status: config.rate_limit_status,
            };
            classifier.classify(&page, &UrlForms::new(target_url))
        }
        Err(error) => SearchOutcome::Blocked(error),
    };

    if let SearchOutcome::Blocked(reason) = &outcome {
        warn!(query, %reason, "search query blocked");
    }

    tokio::time::sleep(config.delay()).await;
    outcome
}
